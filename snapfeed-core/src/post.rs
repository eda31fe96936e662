use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a post.
///
/// Backed by a UUID v7: random enough to never collide, and ordered by
/// creation time so ids sort the same way the feed does.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub String);

impl PostId {
    pub fn new() -> Self {
        Self::issue().0
    }

    /// A fresh id together with the instant encoded in it.
    ///
    /// Posts take their `created_at` from here, so sorting by time and
    /// sorting by id never disagree, however long the upload takes.
    pub fn issue() -> (Self, DateTime<Utc>) {
        let uuid = Uuid::now_v7();
        let created_at = uuid
            .get_timestamp()
            .and_then(|ts| {
                let (secs, nanos) = ts.to_unix();
                DateTime::from_timestamp(secs as i64, nanos)
            })
            .unwrap_or_else(Utc::now);
        (Self(uuid.to_string()), created_at)
    }

    pub fn from_string(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PostId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A published photo. Created once per successful upload, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub caption: String,
    /// Signed, time-limited read URL for the image.
    pub image_url: String,
    /// Permanent locator of the stored object; needs credentials to fetch.
    pub blob_url: String,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(
        id: PostId,
        caption: impl Into<String>,
        image_url: impl Into<String>,
        blob_url: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            caption: caption.into(),
            image_url: image_url.into(),
            blob_url: blob_url.into(),
            created_at,
        }
    }

    /// Feed order: newest `created_at` first, ties broken by id descending.
    pub fn newest_first(a: &Post, b: &Post) -> std::cmp::Ordering {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    }
}

/// Fixed-width RFC 3339 (`2024-05-01T12:00:00.123Z`) so lexical order in a
/// document store matches chronological order.
pub mod iso_millis {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn format(dt: &DateTime<Utc>) -> String {
        dt.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(dt))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post_at(id: &str, millis: i64) -> Post {
        Post::new(
            PostId::from_string(id.to_string()),
            "",
            "https://img",
            "https://blob",
            Utc.timestamp_millis_opt(millis).unwrap(),
        )
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let post = post_at("p1", 1_700_000_000_123);
        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["id"], "p1");
        assert_eq!(value["imageUrl"], "https://img");
        assert_eq!(value["blobUrl"], "https://blob");
        assert_eq!(value["createdAt"], "2023-11-14T22:13:20.123Z");
    }

    #[test]
    fn ignores_store_specific_fields_when_reading() {
        let raw = serde_json::json!({
            "_id": {"$oid": "65a1"},
            "id": "p1",
            "caption": "hi",
            "imageUrl": "u",
            "blobUrl": "b",
            "createdAt": "2024-01-01T00:00:00.000Z"
        });
        let post: Post = serde_json::from_value(raw).unwrap();
        assert_eq!(post.caption, "hi");
        assert_eq!(post.created_at, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn newest_first_orders_by_time_then_id() {
        let mut posts = vec![post_at("a", 1_000), post_at("c", 3_000), post_at("b", 3_000)];
        posts.sort_by(Post::newest_first);
        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn generated_ids_are_unique_and_ordered() {
        let a = PostId::new();
        let b = PostId::new();
        assert_ne!(a, b);
        assert!(a < b);
    }

    #[test]
    fn issued_time_is_the_one_inside_the_id() {
        let before = Utc::now();
        let (first, first_at) = PostId::issue();
        let (second, second_at) = PostId::issue();

        assert!(first < second);
        assert!(first_at <= second_at);
        assert_eq!(first_at.timestamp_subsec_nanos() % 1_000_000, 0);
        assert!(first_at >= before - chrono::Duration::milliseconds(1));
        assert!(first_at <= Utc::now());
    }
}
