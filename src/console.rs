//! Console output helpers.
//!
//! A [`Printer`] wraps any writer and is passed to every command, so output
//! can be captured in tests instead of going through a global console.

use console::{measure_text_width, style, Style};
use std::io::{self, Write};

pub struct Printer<W: Write> {
    out: W,
}

impl Printer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Printer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Title in a box sized to its text
    pub fn header(&mut self, title: &str) -> io::Result<()> {
        let width = measure_text_width(title) + 2;
        let border = Style::new().dim();
        writeln!(self.out, "{}", border.apply_to(format!("╭{}╮", "─".repeat(width))))?;
        writeln!(
            self.out,
            "{} {} {}",
            border.apply_to("│"),
            style(title).cyan().bold(),
            border.apply_to("│")
        )?;
        writeln!(self.out, "{}", border.apply_to(format!("╰{}╯", "─".repeat(width))))
    }

    pub fn success(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{} {}", style("✓").green().bold(), message)
    }

    pub fn error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{} {}", style("Error:").red().bold(), message)
    }

    pub fn info(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{} {}", style("ℹ").blue().bold(), message)
    }

    /// Agent reply framed in a green panel with `title` in the top border
    pub fn response(&mut self, text: &str, title: &str) -> io::Result<()> {
        let lines: Vec<&str> = text.lines().collect();
        let content_width = lines
            .iter()
            .map(|line| measure_text_width(line))
            .max()
            .unwrap_or(0);
        let title_width = measure_text_width(title) + 2;
        let inner = content_width.max(title_width);
        let width = inner + 2;

        let border = Style::new().green();
        let fill = width - title_width;
        let left = fill / 2;
        writeln!(
            self.out,
            "{}{}{}",
            border.apply_to(format!("╭{}", "─".repeat(left))),
            style(format!(" {} ", title)).bold(),
            border.apply_to(format!("{}╮", "─".repeat(fill - left)))
        )?;
        for line in &lines {
            let pad = inner - measure_text_width(line);
            writeln!(
                self.out,
                "{} {}{} {}",
                border.apply_to("│"),
                line,
                " ".repeat(pad),
                border.apply_to("│")
            )?;
        }
        writeln!(self.out, "{}", border.apply_to(format!("╰{}╯", "─".repeat(width))))
    }

    /// One entry of the deployed-agents listing
    pub fn agent_entry(&mut self, display_name: &str, resource_name: &str) -> io::Result<()> {
        writeln!(self.out, "  • {}", style(display_name).cyan())?;
        writeln!(self.out, "    Resource: {}", resource_name)?;
        writeln!(self.out)
    }

    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text)
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    /// Input prompt, flushed without a trailing newline
    pub fn prompt(&mut self, label: &str) -> io::Result<()> {
        write!(self.out, "{}", style(label).bold())?;
        self.out.flush()
    }
}
