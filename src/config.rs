use crate::builder::DescriptionBuilder;
use crate::validate::DescriptionValidator;

/// Customized config for creating a [`DescriptionBuilder`] or a [`DescriptionValidator`].
///
/// ```
/// # use sfu_desc::DescriptionConfig;
/// let builder = DescriptionConfig::new()
///     .set_require_tracks(true)
///     .build();
/// ```
///
/// Configs implement [`Clone`] so one config can be used for every call on a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionConfig {
    pub(crate) two_byte_extensions: bool,
    pub(crate) require_tracks: bool,
    pub(crate) require_rtx_association: bool,
}

impl DescriptionConfig {
    /// Creates a new default config.
    pub fn new() -> Self {
        DescriptionConfig::default()
    }

    /// Allow header extension ids above 14.
    ///
    /// The one-byte header form (RFC 8285) only has room for ids 1-14. When the
    /// forwarding engine writes the two-byte form, ids 1-255 are usable.
    ///
    /// Defaults to `false`.
    pub fn set_two_byte_extensions(mut self, enabled: bool) -> Self {
        self.two_byte_extensions = enabled;
        self
    }

    /// Whether header extension ids above 14 are allowed.
    pub fn two_byte_extensions(&self) -> bool {
        self.two_byte_extensions
    }

    /// Require at least one track in a valid description.
    ///
    /// A call where nobody sends video yet has no tracks, which is why this
    /// defaults to `false`.
    pub fn set_require_tracks(mut self, enabled: bool) -> Self {
        self.require_tracks = enabled;
        self
    }

    /// Whether an empty track list is a violation.
    pub fn require_tracks(&self) -> bool {
        self.require_tracks
    }

    /// Require every `rtx` payload type to have an `apt` parameter pointing
    /// to another payload type in the description.
    ///
    /// Defaults to `true`.
    pub fn set_require_rtx_association(mut self, enabled: bool) -> Self {
        self.require_rtx_association = enabled;
        self
    }

    /// Whether `rtx` payload types are checked for their `apt` parameter.
    pub fn require_rtx_association(&self) -> bool {
        self.require_rtx_association
    }

    /// Create an empty [`DescriptionBuilder`] using this config.
    pub fn build(self) -> DescriptionBuilder {
        DescriptionBuilder::with_config(self)
    }

    /// Create a [`DescriptionValidator`] using this config.
    pub fn validator(&self) -> DescriptionValidator {
        DescriptionValidator::new(self.clone())
    }
}

impl Default for DescriptionConfig {
    fn default() -> Self {
        Self {
            two_byte_extensions: false,
            require_tracks: false,
            require_rtx_association: true,
        }
    }
}
