//! Parsing of loot text such as `"1d4 [Gems] | Torch @price[2] {1d6[sp]}"`.
//!
//! Each `|`-separated alternative goes through three passes, in order:
//! currency tags `{...}` are cut out, inline rolls `[[...]]` are replaced by
//! their value, and the remainder is split into leading text, `@command[arg]`
//! overrides, and an optional `[table]` reference.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use lw_core::FormulaContext;
use lw_dice::Roller;

use crate::error::LootResult;

/// A structured property override written as `@name[arg]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Command name, lowercased.
    pub name: String,
    /// Raw argument (a formula or text).
    pub arg: String,
}

impl Command {
    /// Build a command.
    pub fn new(name: impl Into<String>, arg: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arg: arg.into(),
        }
    }
}

/// One alternative of a text result, decomposed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTextToken {
    /// Leading text: an item name, or a draw count when `table` is set.
    pub text: String,
    /// Overrides in the order written.
    pub commands: Vec<Command>,
    /// Raw bracketed table reference.
    pub table: Option<String>,
    /// Collection set with `@pack[...]`.
    pub collection: Option<String>,
}

/// Compiled patterns for loot text.
#[derive(Debug, Clone)]
pub struct TextPatterns {
    currency: Regex,
    inline_roll: Regex,
    command: Regex,
    table: Regex,
    whitespace: Regex,
}

impl TextPatterns {
    /// Compile the patterns.
    pub fn new() -> LootResult<Self> {
        Ok(Self {
            currency: Regex::new(r"\{([^{}]*)\}")?,
            inline_roll: Regex::new(r"\[\[([^\[\]]*)\]\]")?,
            command: Regex::new(r"@([A-Za-z_][A-Za-z0-9_-]*)\[([^\[\]]*)\]")?,
            table: Regex::new(r"\[([^\[\]]+)\]")?,
            whitespace: Regex::new(r"\s+")?,
        })
    }

    /// Split a result on `|`, dropping empty alternatives.
    pub fn split_alternatives<'t>(&self, text: &'t str) -> Vec<&'t str> {
        text.split('|')
            .map(str::trim)
            .filter(|alt| !alt.is_empty())
            .collect()
    }

    /// Remove every `{formula}` tag, returning the remaining text and the
    /// formulas in order.
    pub fn extract_currency(&self, text: &str) -> (String, Vec<String>) {
        let formulas = self
            .currency
            .captures_iter(text)
            .map(|caps| caps[1].trim().to_string())
            .filter(|formula| !formula.is_empty())
            .collect();
        let rest = self.currency.replace_all(text, " ");
        (self.collapse(&rest), formulas)
    }

    /// Replace every `[[formula]]` with its rolled integer value.
    pub fn expand_inline_rolls(
        &self,
        text: &str,
        dice: &mut Roller,
        context: &FormulaContext,
    ) -> String {
        self.inline_roll
            .replace_all(text, |caps: &Captures<'_>| {
                dice.roll_formula(caps[1].trim(), context).to_string()
            })
            .into_owned()
    }

    /// Split text into leading text, commands, and a table reference.
    ///
    /// The first bracket not preceded by `@command` is the table reference.
    /// `@pack[id]` sets the collection instead of becoming a command.
    pub fn tokenize(&self, text: &str) -> ParsedTextToken {
        let mut token = ParsedTextToken::default();
        for caps in self.command.captures_iter(text) {
            let name = caps[1].to_lowercase();
            let arg = caps[2].trim().to_string();
            if name == "pack" {
                token.collection = Some(arg);
            } else {
                token.commands.push(Command { name, arg });
            }
        }

        let without_commands = self.command.replace_all(text, " ");
        token.table = self
            .table
            .captures(&without_commands)
            .map(|caps| caps[1].trim().to_string())
            .filter(|table| !table.is_empty());
        let leading = self.table.replace(&without_commands, " ");
        token.text = self.collapse(&leading);
        token
    }

    fn collapse(&self, text: &str) -> String {
        self.whitespace.replace_all(text.trim(), " ").into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> TextPatterns {
        TextPatterns::new().unwrap()
    }

    #[test]
    fn split_on_pipes() {
        assert_eq!(
            patterns().split_alternatives("Torch | | Rope |Chalk"),
            vec!["Torch", "Rope", "Chalk"]
        );
    }

    #[test]
    fn currency_tags_are_removed() {
        let (rest, formulas) =
            patterns().extract_currency("Pouch {2d6[gp], 1d4[sp]} of holding {3[cp]}");
        assert_eq!(rest, "Pouch of holding");
        assert_eq!(formulas, vec!["2d6[gp], 1d4[sp]", "3[cp]"]);
    }

    #[test]
    fn inline_rolls_are_expanded() {
        let mut dice = Roller::new(3);
        let text = patterns().expand_inline_rolls(
            "[[1d1 + 2]] arrows and [[2]] bolts",
            &mut dice,
            &FormulaContext::new(),
        );
        assert_eq!(text, "3 arrows and 2 bolts");
    }

    #[test]
    fn table_reference_with_count() {
        let token = patterns().tokenize("1d4 [Gems]");
        assert_eq!(token.text, "1d4");
        assert_eq!(token.table.as_deref(), Some("Gems"));
        assert!(token.commands.is_empty());
    }

    #[test]
    fn commands_and_pack() {
        let token = patterns().tokenize("Longsword @price[1d10 + 5] @pack[srd-items] @Rarity[rare]");
        assert_eq!(token.text, "Longsword");
        assert_eq!(token.table, None);
        assert_eq!(token.collection.as_deref(), Some("srd-items"));
        assert_eq!(
            token.commands,
            vec![Command::new("price", "1d10 + 5"), Command::new("rarity", "rare")]
        );
    }

    #[test]
    fn command_bracket_is_not_a_table() {
        let token = patterns().tokenize("2 @quantity[3] [dungeon.Trinkets]");
        assert_eq!(token.text, "2");
        assert_eq!(token.table.as_deref(), Some("dungeon.Trinkets"));
        assert_eq!(token.commands.len(), 1);
    }
}
