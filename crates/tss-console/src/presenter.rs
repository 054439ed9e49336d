use std::{
    io::{self, Write as _},
    sync::RwLock,
};

use async_trait::async_trait;
use colored::{ColoredString, Colorize};
use tokio::{
    io::{AsyncBufReadExt, BufReader, Stdin},
    sync::Mutex,
};

use tss_core::{
    config::Language,
    errors::Error,
    events::{Event, Question},
    ports::{is_yes, Console, NoticeKind},
    Result,
};

use crate::{
    rtl::Reshaper,
    text::{render_event, render_question, Text},
};

const TITLE: &str = "Telegram Super Scraper v2.0";
const SUBTITLE: &str = "Advanced Telegram Group Manager";
const NOTICE: &str = "For legal use only - Respect privacy";

/// Interactive terminal: colored notices and line-based input from stdin.
pub struct TerminalConsole {
    language: RwLock<Language>,
    reshaper: Reshaper,
    input: Mutex<BufReader<Stdin>>,
}

impl TerminalConsole {
    pub fn new(language: Language, reshaper: Reshaper) -> Self {
        Self {
            language: RwLock::new(language),
            reshaper,
            input: Mutex::new(BufReader::new(tokio::io::stdin())),
        }
    }

    pub fn language(&self) -> Language {
        *self.language.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_language(&self, language: Language) {
        *self.language.write().unwrap_or_else(|e| e.into_inner()) = language;
    }

    pub fn tr(&self, text: Text) -> &'static str {
        text.tr(self.language())
    }

    pub fn say(&self, kind: NoticeKind, text: Text) {
        self.notify(kind, self.tr(text));
    }

    /// Prompt with a catalog string.
    pub async fn ask(&self, text: Text) -> Result<String> {
        self.prompt(self.tr(text)).await
    }

    /// Prompt showing the current value; empty input keeps it.
    pub async fn ask_or_keep(&self, text: Text, current: &str) -> Result<String> {
        let label = format!("{} [{}: {current}]", self.tr(text), self.tr(Text::CurrentValue));
        let answer = self.prompt(&label).await?;
        Ok(if answer.is_empty() {
            current.to_string()
        } else {
            answer
        })
    }

    pub fn clear_screen(&self) {
        print!("\x1B[2J\x1B[1;1H");
        let _ = io::stdout().flush();
    }

    pub fn header(&self) {
        for line in boxed(&[TITLE, SUBTITLE, NOTICE]) {
            println!("{}", line.cyan().bold());
        }
        println!();
    }

    pub fn menu(&self, title: &str, options: &[(&str, &str)]) {
        let title = self.display(title);
        let lines: Vec<String> = options
            .iter()
            .map(|(key, label)| format!("{key}. {}", self.display(label)))
            .collect();
        for line in render_menu(&title, &lines) {
            println!("{}", line.blue());
        }
    }

    pub async fn pause(&self) -> Result<()> {
        self.prompt(self.tr(Text::PressEnter)).await.map(|_| ())
    }

    fn display(&self, text: &str) -> String {
        if self.language().is_rtl() {
            self.reshaper.apply(text)
        } else {
            text.to_string()
        }
    }
}

#[async_trait]
impl Console for TerminalConsole {
    fn notify(&self, kind: NoticeKind, text: &str) {
        let line = format!("{} {}", icon(kind), self.display(text));
        match kind {
            NoticeKind::Error => eprintln!("{line}"),
            _ => println!("{line}"),
        }
    }

    fn report(&self, event: Event) {
        tracing::debug!(?event, "event");
        for (kind, text) in render_event(self.language(), &event) {
            self.notify(kind, &text);
        }
    }

    async fn prompt(&self, text: &str) -> Result<String> {
        print!("{} {}: ", "[?]".cyan().bold(), self.display(text));
        io::stdout().flush()?;

        let mut line = String::new();
        let read = self.input.lock().await.read_line(&mut line).await?;
        if read == 0 {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stdin closed",
            )));
        }
        Ok(line.trim().to_string())
    }

    async fn confirm(&self, question: Question) -> Result<bool> {
        let text = render_question(self.language(), &question);
        let answer = self.prompt(&text).await?;
        Ok(is_yes(&answer))
    }
}

fn icon(kind: NoticeKind) -> ColoredString {
    match kind {
        NoticeKind::Info => "[ℹ]".blue(),
        NoticeKind::Success => "[✓]".green(),
        NoticeKind::Warning => "[⚠]".yellow(),
        NoticeKind::Error => "[✗]".red(),
        NoticeKind::Progress => "[↻]".magenta(),
    }
}

/// Centered lines inside a double-line box.
fn boxed(lines: &[&str]) -> Vec<String> {
    let inner = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 8;
    let mut out = Vec::with_capacity(lines.len() + 2);
    out.push(format!("╔{}╗", "═".repeat(inner)));
    for line in lines {
        let len = line.chars().count();
        let left = (inner - len) / 2;
        let right = inner - len - left;
        out.push(format!("║{}{line}{}║", " ".repeat(left), " ".repeat(right)));
    }
    out.push(format!("╚{}╝", "═".repeat(inner)));
    out
}

/// Title bar followed by left-aligned option rows.
fn render_menu(title: &str, options: &[String]) -> Vec<String> {
    let width = options
        .iter()
        .map(|o| o.chars().count())
        .chain(std::iter::once(title.chars().count()))
        .max()
        .unwrap_or(0)
        + 4;

    let title_len = title.chars().count();
    let left = (width - title_len) / 2;
    let right = width - title_len - left;

    let mut out = Vec::with_capacity(options.len() + 4);
    out.push(format!("╔{}╗", "═".repeat(width)));
    out.push(format!("║{}{title}{}║", " ".repeat(left), " ".repeat(right)));
    out.push(format!("╠{}╣", "═".repeat(width)));
    for option in options {
        let pad = width - option.chars().count() - 2;
        out.push(format!("║  {option}{}║", " ".repeat(pad)));
    }
    out.push(format!("╚{}╝", "═".repeat(width)));
    out
}
