use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    #[default]
    Standard,
    Story,
    Poll,
    Link,
    Campaign,
    Volunteer,
    NewProfile,
    Sponsored,
    Emergency,
}

impl PostType {
    /// Selector order.
    pub const ALL: [PostType; 9] = [
        Self::Standard,
        Self::Story,
        Self::Poll,
        Self::Link,
        Self::Campaign,
        Self::Volunteer,
        Self::NewProfile,
        Self::Sponsored,
        Self::Emergency,
    ];

    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "standard" => Some(Self::Standard),
            "story" => Some(Self::Story),
            "poll" => Some(Self::Poll),
            "link" => Some(Self::Link),
            "campaign" => Some(Self::Campaign),
            "volunteer" => Some(Self::Volunteer),
            "new_profile" => Some(Self::NewProfile),
            "sponsored" => Some(Self::Sponsored),
            "emergency" => Some(Self::Emergency),
            _ => None,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Story => "story",
            Self::Poll => "poll",
            Self::Link => "link",
            Self::Campaign => "campaign",
            Self::Volunteer => "volunteer",
            Self::NewProfile => "new_profile",
            Self::Sponsored => "sponsored",
            Self::Emergency => "emergency",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Story => "Story",
            Self::Poll => "Poll",
            Self::Link => "Link",
            Self::Campaign => "Campaign",
            Self::Volunteer => "Volunteer",
            Self::NewProfile => "New Profile",
            Self::Sponsored => "Sponsored",
            Self::Emergency => "Emergency",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Standard => "Regular text post with optional image",
            Self::Story => "Share a story with image or video",
            Self::Poll => "Create a poll for your audience",
            Self::Link => "Share a link with your audience",
            Self::Campaign => "Start a fundraising campaign",
            Self::Volunteer => "Request volunteer help",
            Self::NewProfile => "Create a new pet profile",
            Self::Sponsored => "Create a sponsored post",
            Self::Emergency => "Report a lost pet or emergency",
        }
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmergencyType {
    PawwliceAlert,
    MedicalEmergency,
}

impl EmergencyType {
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "pawwlice_alert" => Some(Self::PawwliceAlert),
            "medical_emergency" => Some(Self::MedicalEmergency),
            _ => None,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::PawwliceAlert => "pawwlice_alert",
            Self::MedicalEmergency => "medical_emergency",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PawwliceAlert => "PawwLice Alert",
            Self::MedicalEmergency => "Medical Emergency",
        }
    }
}

/// A post as returned by the feed endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerPost {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_avatar: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(rename = "type", default)]
    pub post_type: String,
    #[serde(default, deserialize_with = "count_from_any")]
    pub likes_count: u64,
    #[serde(default, deserialize_with = "count_from_any")]
    pub comments_count: u64,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub media: Vec<PostMedia>,
}

impl ServerPost {
    pub fn kind(&self) -> Option<PostType> {
        PostType::from_wire(&self.post_type)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostMedia {
    #[serde(alias = "_id")]
    pub id: String,
    pub url: String,
    #[serde(rename = "type", default)]
    pub media_type: String,
}

// The API sends counters as numbers on some routes and as strings on others.
fn count_from_any<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Text(String),
        Null(Option<()>),
    }

    match Count::deserialize(deserializer)? {
        Count::Number(value) => Ok(value),
        Count::Text(text) => text
            .trim()
            .parse::<u64>()
            .map_err(|err| serde::de::Error::custom(format!("invalid count {:?}: {}", text, err))),
        Count::Null(_) => Ok(0),
    }
}
