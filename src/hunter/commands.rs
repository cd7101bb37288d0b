//! Line-oriented command parsing for the interactive session.
//!
//! Verbs are case-insensitive; ids, titles and descriptions keep their case.

use crate::hunter::service::HunterCommand;
use crate::hunter::types::{NewQuest, Rank};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Hunter(HunterCommand),
    Help,
    Quit,
    /// Unrecognized or malformed input; carries the message to show
    Invalid(String),
}

pub const HELP_TEXT: &str = "\
Commands:
  STATUS | S                     show level, rank, gold
  QUESTS | Q                     list quests
  SHADOWS | ARMY                 list the shadow army
  GAIN <exp>                     add experience
  COMPLETE <quest-id>            complete a quest
  PROGRESS <quest-id> <percent>  record quest progress
  ADD <rank> <exp> <gold> <daily|once> <title> [| description]
  EDIT <quest-id> <title> [| description]
  RESET                          reset daily quests now
  EXTRACT <type>                 extract a shadow
  ARISE <shadow-id>... | ARISE ALL
  HELP | QUIT";

/// Split off the first `n` whitespace-separated words, returning them and
/// the untouched remainder.
fn leading_words(input: &str, n: usize) -> (Vec<&str>, &str) {
    let mut words = Vec::with_capacity(n);
    let mut rest = input.trim_start();
    while words.len() < n && !rest.is_empty() {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        words.push(&rest[..end]);
        rest = rest[end..].trim_start();
    }
    (words, rest)
}

/// `title | description`, description optional.
fn split_title(text: &str) -> (String, String) {
    match text.split_once('|') {
        Some((title, description)) => (title.trim().to_string(), description.trim().to_string()),
        None => (text.trim().to_string(), String::new()),
    }
}

fn usage(text: &str) -> SessionCommand {
    SessionCommand::Invalid(format!("Usage: {}", text))
}

pub fn parse_command(input: &str) -> SessionCommand {
    let (head, rest) = leading_words(input, 1);
    let Some(verb) = head.first() else {
        return SessionCommand::Invalid("Type HELP for commands.".to_string());
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    match verb.to_ascii_uppercase().as_str() {
        "HELP" | "H" | "?" => SessionCommand::Help,
        "QUIT" | "EXIT" => SessionCommand::Quit,
        "STATUS" | "S" => SessionCommand::Hunter(HunterCommand::Status),
        "QUESTS" | "Q" => SessionCommand::Hunter(HunterCommand::ListQuests),
        "SHADOWS" | "ARMY" => SessionCommand::Hunter(HunterCommand::ListShadows),
        "RESET" => SessionCommand::Hunter(HunterCommand::ResetDaily),

        "GAIN" => match args.as_slice() {
            [amount] => match amount.parse::<u64>() {
                Ok(amount) => SessionCommand::Hunter(HunterCommand::GainExperience(amount)),
                Err(_) => usage("GAIN <exp> (whole number)"),
            },
            _ => usage("GAIN <exp>"),
        },

        "COMPLETE" | "DONE" => match args.as_slice() {
            [quest_id] => {
                SessionCommand::Hunter(HunterCommand::CompleteQuest(quest_id.to_string()))
            }
            _ => usage("COMPLETE <quest-id>"),
        },

        "PROGRESS" => match args.as_slice() {
            [quest_id, percent] => match percent.trim_end_matches('%').parse::<u32>() {
                Ok(percent) => SessionCommand::Hunter(HunterCommand::UpdateProgress {
                    quest_id: quest_id.to_string(),
                    percent: percent.min(100) as u8,
                }),
                Err(_) => usage("PROGRESS <quest-id> <0-100>"),
            },
            _ => usage("PROGRESS <quest-id> <percent>"),
        },

        "ADD" => parse_add(rest),

        "EDIT" => {
            let (id, text) = leading_words(rest, 1);
            match id.first() {
                Some(quest_id) if !text.is_empty() => {
                    let (title, description) = split_title(text);
                    SessionCommand::Hunter(HunterCommand::EditQuest {
                        quest_id: quest_id.to_string(),
                        title,
                        description,
                    })
                }
                _ => usage("EDIT <quest-id> <title> [| description]"),
            }
        }

        "EXTRACT" => match args.as_slice() {
            [shadow_type] => {
                SessionCommand::Hunter(HunterCommand::Extract(shadow_type.to_string()))
            }
            _ => usage("EXTRACT <type>"),
        },

        "ARISE" => match args.as_slice() {
            [] => usage("ARISE <shadow-id>... | ARISE ALL"),
            [all] if all.eq_ignore_ascii_case("all") => {
                SessionCommand::Hunter(HunterCommand::AriseAll)
            }
            [shadow_id] => SessionCommand::Hunter(HunterCommand::Arise(shadow_id.to_string())),
            ids => SessionCommand::Hunter(HunterCommand::AriseMany(
                ids.iter().map(|id| id.to_string()).collect(),
            )),
        },

        other => SessionCommand::Invalid(format!(
            "Unknown command '{}'. Type HELP for commands.",
            other
        )),
    }
}

fn parse_add(rest: &str) -> SessionCommand {
    const USAGE: &str = "ADD <rank> <exp> <gold> <daily|once> <title> [| description]";
    let (fields, text) = leading_words(rest, 4);
    let [rank, exp, gold, cadence] = fields.as_slice() else {
        return usage(USAGE);
    };
    if text.is_empty() {
        return usage(USAGE);
    }
    let Ok(rank) = rank.parse::<Rank>() else {
        return usage(USAGE);
    };
    let (Ok(exp), Ok(gold)) = (exp.parse::<u64>(), gold.parse::<u64>()) else {
        return usage(USAGE);
    };
    let is_daily = match cadence.to_ascii_lowercase().as_str() {
        "daily" => true,
        "once" => false,
        _ => return usage(USAGE),
    };

    let (title, description) = split_title(text);
    let mut quest = NewQuest::new(&title, &description, rank, exp);
    if gold > 0 {
        quest = quest.with_reward_gold(gold);
    }
    if is_daily {
        quest = quest.as_daily();
    }
    SessionCommand::Hunter(HunterCommand::AddQuest(quest))
}
