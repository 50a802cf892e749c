//! Phrase-building workspace.
//!
//! Subtitle lines are "ripped" into individual vocabulary tokens that the
//! learner can then reorder to build a phrase.

use crate::types::{Subtitle, Token};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceToken {
    pub id: String,
    pub token: Token,
}

/// Pinyin and meaning shown when hovering a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub pinyin: String,
    pub meaning: String,
}

#[derive(Debug, Clone, Default)]
pub struct Workspace {
    tokens: Vec<WorkspaceToken>,
    next_id: u64,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokens(&self) -> &[WorkspaceToken] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Append the subtitle's tokens. Lines without token data are split into
    /// one bare token per character. Returns how many tokens were added.
    pub fn rip(&mut self, subtitle: &Subtitle) -> usize {
        let tokens: Vec<Token> = match &subtitle.tokens {
            Some(tokens) => tokens.clone(),
            None => subtitle
                .text
                .chars()
                .map(|c| Token {
                    hanzi: c.to_string(),
                    ..Token::default()
                })
                .collect(),
        };
        let added = tokens.len();
        for token in tokens {
            self.push(token);
        }
        added
    }

    /// Append one token and return its id.
    pub fn push(&mut self, token: Token) -> String {
        self.next_id += 1;
        let id = format!("tok-{}", self.next_id);
        self.tokens.push(WorkspaceToken {
            id: id.clone(),
            token,
        });
        id
    }

    /// Move a token to the end of the phrase. Returns `false` for unknown ids.
    pub fn move_to_end(&mut self, id: &str) -> bool {
        let Some(pos) = self.tokens.iter().position(|t| t.id == id) else {
            return false;
        };
        let token = self.tokens.remove(pos);
        self.tokens.push(token);
        true
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    /// Tooltip for a token, or `None` when it has neither pinyin nor meaning.
    pub fn tooltip(&self, id: &str) -> Option<Tooltip> {
        let token = &self.tokens.iter().find(|t| t.id == id)?.token;
        if token.pinyin.is_empty() && token.meaning.is_empty() {
            return None;
        }
        let meaning = if token.meaning.is_empty() {
            "?".to_string()
        } else {
            token.meaning.clone()
        };
        Some(Tooltip {
            pinyin: token.pinyin.clone(),
            meaning,
        })
    }

    pub fn phrase(&self) -> String {
        self.tokens.iter().map(|t| t.token.hanzi.as_str()).collect()
    }
}
