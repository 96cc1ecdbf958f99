use std::fmt::Display;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// A tracked player, as it appears in the profile URL.
#[derive(Clone, PartialEq, Eq, Debug, TypedBuilder, Serialize, Deserialize)]
pub struct PlayerIdentity {
    #[builder(setter(into))]
    pub region: Region,
    #[builder(setter(into))]
    pub name: PlayerName,
    #[builder(setter(into))]
    pub tag: Tag,
}

impl PlayerIdentity {
    pub fn new(
        region: impl Into<Region>,
        name: impl Into<PlayerName>,
        tag: impl Into<Tag>,
    ) -> Self {
        Self {
            region: region.into(),
            name: name.into(),
            tag: tag.into(),
        }
    }
}

impl Display for PlayerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.name, self.tag)
    }
}

#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    derive_more::From,
    derive_more::AsRef,
    derive_more::Display,
    Serialize,
    Deserialize,
)]
#[as_ref(forward)]
pub struct Region(String);
impl From<&str> for Region {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    derive_more::From,
    derive_more::AsRef,
    derive_more::Display,
    Serialize,
    Deserialize,
)]
#[as_ref(forward)]
pub struct PlayerName(String);
impl From<&str> for PlayerName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    derive_more::From,
    derive_more::AsRef,
    derive_more::Display,
    Serialize,
    Deserialize,
)]
#[as_ref(forward)]
pub struct Tag(String);
impl From<&str> for Tag {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}
