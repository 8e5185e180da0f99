use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default = "default_true")]
    pub task_updates: bool,
    #[serde(default = "default_true")]
    pub ai_insights: bool,
    #[serde(default)]
    pub daily_digest: bool,
}

fn default_true() -> bool {
    true
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            task_updates: true,
            ai_insights: true,
            daily_digest: false,
        }
    }
}

/// Integration tokens and notification toggles stored by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub github_token: String,
    #[serde(default)]
    pub trello_key: String,
    #[serde(default)]
    pub trello_token: String,
    #[serde(default)]
    pub notifications: NotificationSettings,
}

impl Settings {
    /// Copy with every credential reduced to its last four characters.
    pub fn masked(&self) -> Self {
        Self {
            github_token: mask_secret(&self.github_token),
            trello_key: mask_secret(&self.trello_key),
            trello_token: mask_secret(&self.trello_token),
            notifications: self.notifications.clone(),
        }
    }
}

fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSettingsResponse {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"github_token":"ghp_abc"}"#).unwrap();
        assert!(settings.notifications.task_updates);
        assert!(settings.notifications.ai_insights);
        assert!(!settings.notifications.daily_digest);
    }

    #[test]
    fn test_masked() {
        let settings = Settings {
            github_token: "ghp_1234567890".to_string(),
            trello_key: "abc".to_string(),
            trello_token: String::new(),
            notifications: NotificationSettings::default(),
        };
        let masked = settings.masked();
        assert_eq!(masked.github_token, "**********7890");
        assert_eq!(masked.trello_key, "***");
        assert_eq!(masked.trello_token, "");
    }
}
