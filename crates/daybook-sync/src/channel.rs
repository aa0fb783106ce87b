//! Stream identities and per-user channel naming.

use std::fmt;

use crate::models::UserId;

/// One of the three independently subscribed change feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Entries,
    Tags,
    EntryTags,
}

impl Stream {
    /// All streams, in the order the realtime service starts them.
    pub const ALL: [Self; 3] = [Self::Entries, Self::Tags, Self::EntryTags];

    /// Wire name used as the channel prefix.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Entries => "entries",
            Self::Tags => "tags",
            Self::EntryTags => "entry_tags",
        }
    }

    /// Build the per-user channel identifier for this stream.
    ///
    /// The channel namespace does not accept `-`, so the user id's dashes
    /// are rewritten to underscores.
    #[must_use]
    pub fn channel(self, user_id: &UserId) -> String {
        format!(
            "{}:{}",
            self.wire_name(),
            user_id.as_str().replace('-', "_")
        )
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn channel_replaces_dashes_in_user_id() {
        let user_id: UserId = "0192d3f0-1111-7222-8333-444455556666".parse().unwrap();
        let channel = Stream::Entries.channel(&user_id);
        assert_eq!(channel, "entries:0192d3f0_1111_7222_8333_444455556666");
        assert!(!channel.contains('-'));
    }

    #[test]
    fn channels_are_distinct_per_stream() {
        let user_id = UserId::new();
        let channels: Vec<String> = Stream::ALL
            .iter()
            .map(|stream| stream.channel(&user_id))
            .collect();
        assert!(channels[0].starts_with("entries:"));
        assert!(channels[1].starts_with("tags:"));
        assert!(channels[2].starts_with("entry_tags:"));
    }
}
