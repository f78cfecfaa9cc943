//! Display helpers
//!
//! Number and date formatting shared by the terminal and the browser, plus
//! the plain-text tables and transcripts the CLI prints.

use chrono::{DateTime, NaiveDate};

use crate::chat::Transcript;
use crate::format::Block;
use crate::loans::NO_LOANS_MESSAGE;
use crate::models::{ChatMessage, Goal, Loan, Sender};

const NOT_AVAILABLE: &str = "N/A";

/// `$1,234.50`; negative amounts as `-$1,234.50`
pub fn format_money(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// Interest rate with two decimals, `N/A` when unknown
pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{:.2}%", rate),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// `Mar 5, 2025` for ISO dates; other text is shown unchanged
pub fn format_date(date: &str) -> String {
    if date.is_empty() {
        return NOT_AVAILABLE.to_string();
    }

    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(date).ok().map(|dt| dt.date_naive()));

    match parsed {
        Some(day) => day.format("%b %-d, %Y").to_string(),
        None => date.to_string(),
    }
}

/// Plain-text rendering of formatted assistant output
pub fn render_blocks(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(|block| match block {
            Block::Heading(text) => format!("{}\n{}", text, "-".repeat(text.chars().count())),
            Block::Prose(text) => text.clone(),
            Block::Emphasis(text) => text
                .lines()
                .map(|line| format!("> {}", line))
                .collect::<Vec<_>>()
                .join("\n"),
            Block::List(items) => items
                .iter()
                .map(|item| format!("  - {}", item))
                .collect::<Vec<_>>()
                .join("\n"),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn render_message(message: &ChatMessage) -> String {
    let who = match message.sender {
        Sender::User => "You",
        Sender::Ai => "AI",
    };
    format!("{}: {}", who, message.text)
}

pub fn render_transcript(transcript: &Transcript) -> String {
    transcript
        .iter()
        .map(render_message)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_goal_table(goals: &[Goal]) -> String {
    if goals.is_empty() {
        return "No goals yet.".to_string();
    }

    let mut out = format!(
        "{:<4} {:<20} {:<12} {:<8} {:>9} {:<27} {:<14} {}\n",
        "#", "Goal", "Type", "Priority", "Progress", "Saved / Target", "Target Date", "Status"
    );
    out.push_str(&"-".repeat(104));

    for (i, goal) in goals.iter().enumerate() {
        let amounts = format!(
            "{} / {}",
            format_money(goal.current_amount),
            format_money(goal.target_amount)
        );
        let track = if goal.on_track { "On Track" } else { "Off Track" };
        out.push_str(&format!(
            "\n{:<4} {:<20} {:<12} {:<8} {:>8}% {:<27} {:<14} {}",
            i,
            goal.goal_name,
            goal.goal_type,
            goal.priority,
            goal.progress_percent,
            amounts,
            format_date(&goal.target_date),
            track
        ));
    }

    out
}

pub fn render_loan_table(loans: &[Loan]) -> String {
    if loans.is_empty() {
        return NO_LOANS_MESSAGE.to_string();
    }

    let mut out = format!(
        "{:<6} {:<24} {:<14} {:>14} {:>8} {:<13} {:<13} {}\n",
        "ID", "Product", "Type", "Balance", "Rate", "Start Date", "End Date", "Status"
    );
    out.push_str(&"-".repeat(110));

    for loan in loans {
        out.push_str(&format!(
            "\n{:<6} {:<24} {:<14} {:>14} {:>8} {:<13} {:<13} {}",
            loan.product_id,
            loan.product_name,
            loan.product_type,
            format_money(loan.balance),
            format_rate(loan.interest_rate),
            format_date(&loan.start_date),
            format_date(&loan.end_date),
            loan.status_label()
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(999.5), "$999.50");
        assert_eq!(format_money(1234.5), "$1,234.50");
        assert_eq!(format_money(1234567.891), "$1,234,567.89");
        assert_eq!(format_money(-42.0), "-$42.00");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(Some(4.5)), "4.50%");
        assert_eq!(format_rate(None), "N/A");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2025-03-05"), "Mar 5, 2025");
        assert_eq!(format_date("2024-12-31T10:00:00Z"), "Dec 31, 2024");
        assert_eq!(format_date(""), "N/A");
        assert_eq!(format_date("someday"), "someday");
    }

    #[test]
    fn test_render_blocks() {
        let text = render_blocks(&[
            Block::Heading("Risks".into()),
            Block::List(vec!["Inflation".into(), "Job loss".into()]),
            Block::Emphasis("Hi there".into()),
        ]);
        assert_eq!(text, "Risks\n-----\n\n  - Inflation\n  - Job loss\n\n> Hi there");
    }

    #[test]
    fn test_render_transcript() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("Hello"));
        transcript.push(ChatMessage::ai("Hi!"));
        assert_eq!(render_transcript(&transcript), "You: Hello\nAI: Hi!");
    }

    #[test]
    fn test_loan_table() {
        assert_eq!(render_loan_table(&[]), "You currently have no active loans.");

        let table = render_loan_table(&[Loan {
            product_id: 7,
            product_name: "Home Loan".into(),
            balance: 250000.0,
            interest_rate: None,
            ..Default::default()
        }]);
        assert!(table.contains("$250,000.00"));
        assert!(table.lines().last().unwrap().ends_with("N/A"));
    }

    #[test]
    fn test_goal_table() {
        let table = render_goal_table(&[Goal {
            goal_name: "Car".into(),
            current_amount: 60.0,
            target_amount: 100.0,
            progress_percent: 60.0,
            on_track: true,
            ..Default::default()
        }]);
        assert!(table.contains("60%"));
        assert!(table.contains("$60.00 / $100.00"));
        assert!(table.ends_with("On Track"));
    }
}
