use colored::Colorize;

use crate::tree::TreeItem;

const INDENT: &str = "  ";

/// Whether stdout accepts ANSI colors.
pub fn stdout_supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Text form of the visible rows, one per line.
pub struct TreeView<'a> {
    items: &'a [TreeItem],
    is_selected: &'a dyn Fn(&str) -> bool,
}

impl<'a> TreeView<'a> {
    pub fn new(items: &'a [TreeItem], is_selected: &'a dyn Fn(&str) -> bool) -> Self {
        Self { items, is_selected }
    }

    pub fn render(&self, supports_color: bool) -> String {
        let mut out = String::new();
        for item in self.items {
            out.push_str(&INDENT.repeat(item.depth));
            out.push_str(&self.render_row(item, supports_color));
            out.push('\n');
        }
        out
    }

    fn render_row(&self, item: &TreeItem, supports_color: bool) -> String {
        let marker = match (item.kind.is_directory(), item.is_expanded) {
            (true, true) => "▾ ",
            (true, false) => "▸ ",
            (false, _) => "  ",
        };
        let selected = (self.is_selected)(&item.path);
        let name = if !supports_color {
            item.name.clone()
        } else if item.kind.is_directory() {
            item.name.blue().bold().to_string()
        } else {
            item.name.normal().to_string()
        };
        let name = match (selected, supports_color) {
            (true, true) => name.reversed().to_string(),
            (true, false) => format!("{name} *"),
            (false, _) => name,
        };
        format!("{marker}{name}")
    }
}

/// One path per line, or a dimmed placeholder when `paths` is empty.
pub fn render_paths(title: &str, paths: &[String], supports_color: bool) -> String {
    let header = if supports_color {
        title.bold().to_string()
    } else {
        title.to_string()
    };
    let mut out = format!("{header}:\n");
    if paths.is_empty() {
        let none = if supports_color {
            "(none)".dimmed().to_string()
        } else {
            "(none)".to_string()
        };
        out.push_str(&format!("{INDENT}{none}\n"));
    }
    for path in paths {
        out.push_str(&format!("{INDENT}{path}\n"));
    }
    out
}
