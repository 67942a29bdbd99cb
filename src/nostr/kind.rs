//! Human readable labels for well-known event kinds.

const KIND_NAMES: &[(i64, &str)] = &[
    (0, "Metadata"),
    (1, "Short Note"),
    (2, "Recommend Relay"),
    (3, "Contacts"),
    (4, "Encrypted Direct Message"),
    (5, "Event Deletion"),
    (6, "Repost"),
    (7, "Reaction"),
    (8, "Badge Award"),
    (16, "Generic Repost"),
    (40, "Channel Creation"),
    (41, "Channel Metadata"),
    (42, "Channel Message"),
    (43, "Channel Hide Message"),
    (44, "Channel Mute User"),
    (1063, "File Metadata"),
    (1984, "Reporting"),
    (9734, "Zap Request"),
    (9735, "Zap"),
    (10000, "Mute List"),
    (10001, "Pin List"),
    (10002, "Relay List Metadata"),
    (13194, "Wallet Info"),
    (22242, "Client Authentication"),
    (23194, "Wallet Request"),
    (23195, "Wallet Response"),
    (24133, "Nostr Connect"),
    (27235, "HTTP Auth"),
    (30000, "Categorized People List"),
    (30001, "Categorized Bookmark List"),
    (30008, "Profile Badges"),
    (30009, "Badge Definition"),
    (30017, "Stall"),
    (30018, "Product"),
    (30023, "Long-form Content"),
    (30078, "Application-specific Data"),
    (31989, "Handler Recommendation"),
    (31990, "Handler Information"),
];

pub fn kind_name(kind: i64) -> Option<&'static str> {
    KIND_NAMES
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, name)| *name)
}

/// Kinds in `[30000, 40000)` are parameterized replaceable.
pub fn is_parameterized_replaceable(kind: i64) -> bool {
    (30000..40000).contains(&kind)
}
