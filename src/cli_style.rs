//! Terminal rendering for the command line: clap colours, section boxes,
//! key/value lines, tables and bar charts.

use clap::builder::styling::{AnsiColor, Color, Style};
use clap::builder::Styles;
use crossterm::style::{Attribute, Stylize};
use unicode_width::UnicodeWidthStr;

// ═══════════════════════════════════════════════════════════════════════════════
// Clap Styles
// ═══════════════════════════════════════════════════════════════════════════════

pub fn get_styles() -> Styles {
    let heading = Style::new()
        .bold()
        .underline()
        .fg_color(Some(Color::Ansi(AnsiColor::Cyan)));
    let good = Style::new()
        .bold()
        .fg_color(Some(Color::Ansi(AnsiColor::Green)));
    let bad = Style::new()
        .bold()
        .fg_color(Some(Color::Ansi(AnsiColor::Red)));

    Styles::styled()
        .usage(heading)
        .header(heading)
        .literal(good)
        .valid(good)
        .invalid(bad)
        .error(bad)
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Palette
// ═══════════════════════════════════════════════════════════════════════════════

pub mod colors {
    use crossterm::style::Color;

    pub const CYAN: Color = Color::Rgb {
        r: 0,
        g: 255,
        b: 255,
    };
    pub const PURPLE: Color = Color::Rgb {
        r: 180,
        g: 100,
        b: 255,
    };
    pub const MAGENTA: Color = Color::Rgb {
        r: 255,
        g: 0,
        b: 255,
    };
    pub const GREEN: Color = Color::Rgb {
        r: 0,
        g: 255,
        b: 136,
    };
    pub const ORANGE: Color = Color::Rgb {
        r: 255,
        g: 165,
        b: 0,
    };
    pub const RED: Color = Color::Rgb {
        r: 255,
        g: 85,
        b: 85,
    };
    pub const DIM: Color = Color::Rgb {
        r: 128,
        g: 128,
        b: 128,
    };
    pub const WHITE: Color = Color::Rgb {
        r: 255,
        g: 255,
        b: 255,
    };
}

pub mod box_chars {
    pub const ROUND_TOP_LEFT: &str = "╭";
    pub const ROUND_TOP_RIGHT: &str = "╮";
    pub const ROUND_BOTTOM_LEFT: &str = "╰";
    pub const ROUND_BOTTOM_RIGHT: &str = "╯";
    pub const HORIZONTAL: &str = "─";
    pub const VERTICAL: &str = "│";

    pub const T_LEFT: &str = "├";
    pub const T_RIGHT: &str = "┤";
    pub const T_TOP: &str = "┬";
    pub const T_BOTTOM: &str = "┴";
    pub const CROSS: &str = "┼";

    pub const BULLET: &str = "●";
    pub const BULLET_EMPTY: &str = "○";
    pub const DIAMOND: &str = "◆";
    pub const CHECK: &str = "✓";
    pub const CROSS_MARK: &str = "✗";
    pub const BAR: &str = "█";
}

const SECTION_WIDTH: usize = 60;
const BAR_WIDTH: usize = 40;

// ═══════════════════════════════════════════════════════════════════════════════
// Status Indicators
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_success(message: &str) {
    println!(
        " {} {}",
        box_chars::CHECK.with(colors::GREEN).bold(),
        message.with(colors::GREEN)
    );
}

/// Errors go to stderr so stdout only carries results.
pub fn print_error(message: &str) {
    eprintln!(
        " {} {}",
        box_chars::CROSS_MARK.with(colors::RED).bold(),
        message.with(colors::RED)
    );
}

pub fn print_warning(message: &str) {
    println!(
        " {} {}",
        "⚠".with(colors::ORANGE).bold(),
        message.with(colors::ORANGE)
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Sections
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_section_header(title: &str) {
    let title_len = title.width();
    let left = SECTION_WIDTH.saturating_sub(title_len + 4) / 2;
    let right = SECTION_WIDTH.saturating_sub(title_len + 4 + left);

    println!();
    println!(
        "{}{} {} {}{}",
        box_chars::ROUND_TOP_LEFT.with(colors::CYAN),
        box_chars::HORIZONTAL.repeat(left).with(colors::CYAN),
        title.with(colors::CYAN).bold().attribute(Attribute::Italic),
        box_chars::HORIZONTAL.repeat(right).with(colors::CYAN),
        box_chars::ROUND_TOP_RIGHT.with(colors::CYAN)
    );
}

pub fn print_section_footer() {
    println!(
        "{}{}{}",
        box_chars::ROUND_BOTTOM_LEFT.with(colors::CYAN),
        box_chars::HORIZONTAL
            .repeat(SECTION_WIDTH)
            .with(colors::CYAN),
        box_chars::ROUND_BOTTOM_RIGHT.with(colors::CYAN)
    );
    println!();
}

pub fn print_key_value(key: &str, value: &str) {
    println!(
        "  {} {} {}",
        box_chars::BULLET.with(colors::PURPLE),
        format!("{}:", key).with(colors::DIM),
        value.with(colors::WHITE)
    );
}

pub fn print_key_value_highlight(key: &str, value: &str) {
    println!(
        "  {} {} {}",
        box_chars::DIAMOND.with(colors::MAGENTA),
        format!("{}:", key).with(colors::CYAN).bold(),
        value.with(colors::GREEN).bold()
    );
}

pub fn print_empty_list(message: &str) {
    println!(
        "  {} {}",
        box_chars::BULLET_EMPTY.with(colors::DIM),
        message.with(colors::DIM).attribute(Attribute::Italic)
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Bar Chart
// ═══════════════════════════════════════════════════════════════════════════════

/// Number of bar cells for `value` when `max` fills the whole bar.
fn bar_len(value: u64, max: u64) -> usize {
    if max == 0 {
        return 0;
    }
    let len = (value as f64 / max as f64 * BAR_WIDTH as f64).round() as usize;
    if value > 0 {
        len.max(1)
    } else {
        0
    }
}

/// One labelled horizontal bar per entry, scaled to the largest value.
pub fn print_bar_chart(entries: &[(String, u64)]) {
    let max = entries.iter().map(|(_, v)| *v).max().unwrap_or(0);
    let label_width = entries.iter().map(|(l, _)| l.width()).max().unwrap_or(0);

    for (label, value) in entries {
        let padding = label_width.saturating_sub(label.width());
        println!(
            "  {}{} {} {}",
            label.as_str().with(colors::DIM),
            " ".repeat(padding),
            box_chars::BAR.repeat(bar_len(*value, max)).with(colors::PURPLE),
            value.to_string().with(colors::WHITE)
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Table Display
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

pub struct TableBuilder {
    headers: Vec<String>,
    aligns: Vec<Align>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl TableBuilder {
    pub fn new(headers: Vec<&str>) -> Self {
        let col_widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
        TableBuilder {
            aligns: vec![Align::Left; headers.len()],
            headers: headers.into_iter().map(String::from).collect(),
            rows: Vec::new(),
            col_widths,
        }
    }

    /// Right-align the given column, for counts.
    pub fn align_right(mut self, column: usize) -> Self {
        if let Some(align) = self.aligns.get_mut(column) {
            *align = Align::Right;
        }
        self
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = self.col_widths.get_mut(i) {
                *width = (*width).max(cell.width());
            }
        }
        self.rows.push(row);
    }

    fn pad(&self, column: usize, cell: &str) -> String {
        let width = self.col_widths.get(column).copied().unwrap_or(0);
        let padding = " ".repeat(width.saturating_sub(cell.width()));
        match self.aligns.get(column) {
            Some(Align::Right) => format!("{}{}", padding, cell),
            _ => format!("{}{}", cell, padding),
        }
    }

    fn border(&self, left: &str, junction: &str, right: &str) -> String {
        let segments: Vec<String> = self
            .col_widths
            .iter()
            .map(|w| box_chars::HORIZONTAL.repeat(w + 2))
            .collect();
        format!("{}{}{}", left, segments.join(junction), right)
    }

    pub fn print(&self) {
        let vertical = box_chars::VERTICAL.with(colors::CYAN);

        println!(
            "{}",
            self.border(
                box_chars::ROUND_TOP_LEFT,
                box_chars::T_TOP,
                box_chars::ROUND_TOP_RIGHT
            )
            .with(colors::CYAN)
        );

        print!("{}", vertical);
        for (i, header) in self.headers.iter().enumerate() {
            print!(" {} {}", self.pad(i, header).with(colors::CYAN).bold(), vertical);
        }
        println!();

        println!(
            "{}",
            self.border(box_chars::T_LEFT, box_chars::CROSS, box_chars::T_RIGHT)
                .with(colors::CYAN)
        );

        for row in &self.rows {
            print!("{}", vertical);
            for (i, cell) in row.iter().enumerate() {
                print!(" {} {}", self.pad(i, cell).with(colors::WHITE), vertical);
            }
            println!();
        }

        println!(
            "{}",
            self.border(
                box_chars::ROUND_BOTTOM_LEFT,
                box_chars::T_BOTTOM,
                box_chars::ROUND_BOTTOM_RIGHT
            )
            .with(colors::CYAN)
        );
    }
}
