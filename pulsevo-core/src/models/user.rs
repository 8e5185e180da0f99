use serde::{Deserialize, Serialize};

/// Team member as returned by `GET /users` and `GET /users/:id`.
///
/// The list endpoint also embeds per-user task counts; those are ignored
/// here and taken from the `users_stats` map of `GET /tasks` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub initials: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl User {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            initials: None,
            email: None,
            role: None,
            team: None,
            is_active: None,
        }
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    /// Stored initials, or up to two derived from the first and last name.
    pub fn initials(&self) -> String {
        if let Some(initials) = self.initials.as_deref().map(str::trim) {
            if !initials.is_empty() {
                return initials.to_uppercase();
            }
        }

        let words: Vec<&str> = self.name.split_whitespace().collect();
        let picked: Vec<&str> = match words.as_slice() {
            [] => Vec::new(),
            [only] => vec![*only],
            [first, .., last] => vec![*first, *last],
        };

        picked
            .iter()
            .filter_map(|w| w.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Case-insensitive substring match on the display name. The text is
    /// matched as typed, surrounding spaces included.
    pub fn matches_search(&self, search: &str) -> bool {
        search.is_empty() || self.name.to_lowercase().contains(&search.to_lowercase())
    }
}
