//! Resource type tags carried by every sub-entry

use std::fmt;

/// Distance between a localized tag and its base tag
pub const LOCALIZED_TAG_OFFSET: u8 = 24;

/// Payload kind of a sub-entry
///
/// The tag decides whether the sub-entry owns a payload blob and how its
/// metadata words are interpreted. Tags not listed here are kept as
/// [`ResourceType::Unknown`] so they survive a round trip unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    /// One face of a node's cube map
    CubeFace,
    /// Water effect mask
    WaterEffectMask,
    /// Lava effect mask
    LavaEffectMask,
    /// Magnetic effect mask
    MagneticEffectMask,
    /// Shield effect mask
    ShieldEffectMask,
    /// Overlay image placed at pixel coordinates on a cube face
    SpotItem,
    /// Flat frame image
    Frame,
    /// Opaque data blob
    RawData,
    /// Movie
    Movie,
    /// Single-frame movie
    StillMovie,
    /// Text blob
    Text,
    /// Metadata-only record with text semantics
    TextMetadata,
    /// Metadata-only record with numeric semantics
    NumMetadata,
    /// Localized [`ResourceType::SpotItem`]
    LocalizedSpotItem,
    /// Localized [`ResourceType::Frame`]
    LocalizedFrame,
    /// Movie with several tracks
    MultitrackMovie,
    /// Dialog movie
    DialogMovie,
    /// Any other tag
    Unknown(u8),
}

impl ResourceType {
    /// Parse from the on-disk tag
    pub const fn from_tag(tag: u8) -> Self {
        match tag {
            0 => Self::CubeFace,
            1 => Self::WaterEffectMask,
            2 => Self::LavaEffectMask,
            3 => Self::MagneticEffectMask,
            4 => Self::ShieldEffectMask,
            5 => Self::SpotItem,
            6 => Self::Frame,
            7 => Self::RawData,
            8 => Self::Movie,
            10 => Self::StillMovie,
            11 => Self::Text,
            12 => Self::TextMetadata,
            13 => Self::NumMetadata,
            69 => Self::LocalizedSpotItem,
            70 => Self::LocalizedFrame,
            72 => Self::MultitrackMovie,
            74 => Self::DialogMovie,
            other => Self::Unknown(other),
        }
    }

    /// On-disk tag
    pub const fn tag(self) -> u8 {
        match self {
            Self::CubeFace => 0,
            Self::WaterEffectMask => 1,
            Self::LavaEffectMask => 2,
            Self::MagneticEffectMask => 3,
            Self::ShieldEffectMask => 4,
            Self::SpotItem => 5,
            Self::Frame => 6,
            Self::RawData => 7,
            Self::Movie => 8,
            Self::StillMovie => 10,
            Self::Text => 11,
            Self::TextMetadata => 12,
            Self::NumMetadata => 13,
            Self::LocalizedSpotItem => 69,
            Self::LocalizedFrame => 70,
            Self::MultitrackMovie => 72,
            Self::DialogMovie => 74,
            Self::Unknown(tag) => tag,
        }
    }

    /// Records that reuse the offset/size fields as auxiliary values and own
    /// no payload
    pub const fn is_pure_metadata(self) -> bool {
        matches!(self, Self::TextMetadata | Self::NumMetadata)
    }

    /// Records whose first two metadata words are placement coordinates
    pub const fn is_spot_item(self) -> bool {
        matches!(self, Self::SpotItem | Self::LocalizedSpotItem)
    }

    /// Localized variants of spot items and frames
    pub const fn is_localized(self) -> bool {
        matches!(self, Self::LocalizedSpotItem | Self::LocalizedFrame)
    }

    /// Tag used in replacement file names: localized variants map back onto
    /// their base code
    pub const fn base_tag(self) -> u8 {
        if self.is_localized() {
            self.tag() - LOCALIZED_TAG_OFFSET
        } else {
            self.tag()
        }
    }

    /// Display name
    pub const fn name(self) -> &'static str {
        match self {
            Self::CubeFace => "CubeFace",
            Self::WaterEffectMask => "WaterEffectMask",
            Self::LavaEffectMask => "LavaEffectMask",
            Self::MagneticEffectMask => "MagneticEffectMask",
            Self::ShieldEffectMask => "ShieldEffectMask",
            Self::SpotItem => "SpotItem",
            Self::Frame => "Frame",
            Self::RawData => "RawData",
            Self::Movie => "Movie",
            Self::StillMovie => "StillMovie",
            Self::Text => "Text",
            Self::TextMetadata => "TextMetadata",
            Self::NumMetadata => "NumMetadata",
            Self::LocalizedSpotItem => "LocalizedSpotItem",
            Self::LocalizedFrame => "LocalizedFrame",
            Self::MultitrackMovie => "MultitrackMovie",
            Self::DialogMovie => "DialogMovie",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl From<u8> for ResourceType {
    fn from(tag: u8) -> Self {
        Self::from_tag(tag)
    }
}

impl From<ResourceType> for u8 {
    fn from(value: ResourceType) -> Self {
        value.tag()
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
