//! Per-page display state and its transitions.
//!
//! Every axis is independent. Transitions take the state by value and return
//! the next one; nothing here touches the event itself.

/// Which encoding of the event id is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdFormat {
    Hex,
    Note,
    #[default]
    Nevent,
}

impl IdFormat {
    /// `nevent -> note -> hex` for kind 1, `nevent -> hex` otherwise.
    pub fn next(self, kind: i64) -> Self {
        match self {
            Self::Nevent if kind == 1 => Self::Note,
            Self::Nevent => Self::Hex,
            Self::Note => Self::Hex,
            Self::Hex => Self::Nevent,
        }
    }

    /// `note` is only offered for kind 1.
    pub fn normalize(self, kind: i64) -> Self {
        match self {
            Self::Note if kind != 1 => Self::Nevent,
            other => other,
        }
    }

    /// Parses a query value; unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "hex" => Some(Self::Hex),
            "note" => Some(Self::Note),
            "nevent" => Some(Self::Nevent),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hex => "hex",
            Self::Note => "note",
            Self::Nevent => "nevent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureStatus {
    #[default]
    Unchecked,
    Valid,
    Invalid,
}

impl SignatureStatus {
    pub fn from_verified(ok: bool) -> Self {
        if ok {
            Self::Valid
        } else {
            Self::Invalid
        }
    }

    /// Label of the check button.
    pub fn label(self) -> &'static str {
        match self {
            Self::Unchecked => "check",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayState {
    pub raw_visible: bool,
    pub id_format: IdFormat,
    pub pubkey_hex_visible: bool,
    pub signature_status: SignatureStatus,
}

impl DisplayState {
    pub fn toggle_raw(self) -> Self {
        Self {
            raw_visible: !self.raw_visible,
            ..self
        }
    }

    pub fn advance_id_format(self, kind: i64) -> Self {
        Self {
            id_format: self.id_format.normalize(kind).next(kind),
            ..self
        }
    }

    pub fn toggle_pubkey(self) -> Self {
        Self {
            pubkey_hex_visible: !self.pubkey_hex_visible,
            ..self
        }
    }

    /// Records the outcome of an explicit signature check.
    pub fn with_signature(self, ok: bool) -> Self {
        Self {
            signature_status: SignatureStatus::from_verified(ok),
            ..self
        }
    }

    /// Drops combinations that the event's kind does not admit.
    pub fn normalized(self, kind: i64) -> Self {
        Self {
            id_format: self.id_format.normalize(kind),
            ..self
        }
    }

    /// Query pairs for the link-driven toggles. Defaults are omitted and the
    /// signature status is never carried.
    pub fn query_pairs(self) -> Vec<(&'static str, &'static str)> {
        let mut pairs = Vec::new();
        if self.id_format != IdFormat::default() {
            pairs.push(("id", self.id_format.as_str()));
        }
        if self.pubkey_hex_visible {
            pairs.push(("pubkey", "hex"));
        }
        if self.raw_visible {
            pairs.push(("raw", "1"));
        }
        pairs
    }
}
