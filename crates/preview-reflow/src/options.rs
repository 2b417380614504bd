use crate::capabilities::{self, PrinterCapabilityProvider};
use crate::constants::{MAX_SCALE_PERCENT, MIN_SCALE_PERCENT};
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Immutable capture of every print setting a reflow consumes.
///
/// The settings UI produces one snapshot per change; the engine never reads
/// live UI state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SettingsSnapshot {
    // Sheet
    pub paper_size: PaperSize,
    pub orientation: Orientation,
    pub margin: MarginMode,
    pub scale: ScalePolicy,

    // Selection and tiling
    pub page_filter: PageFilter,
    pub pages_per_sheet: PagesPerSheet,
    pub page_order: PageOrder,

    // Device
    pub color_mode: ColorMode,
    pub copies: u32,
    pub duplex: Duplex,
}

impl Default for SettingsSnapshot {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            orientation: Orientation::Portrait,
            margin: MarginMode::Default,
            scale: ScalePolicy::Auto,
            page_filter: PageFilter::All,
            pages_per_sheet: PagesPerSheet::One,
            page_order: PageOrder::RowMajor,
            color_mode: ColorMode::Color,
            copies: 1,
            duplex: Duplex::Off,
        }
    }
}

impl SettingsSnapshot {
    /// Starting snapshot seeded from printer capabilities
    pub fn from_capabilities(provider: &dyn PrinterCapabilityProvider) -> Self {
        let color_mode = if capabilities::color_available(provider) {
            ColorMode::Color
        } else {
            ColorMode::Grayscale
        };
        Self {
            paper_size: capabilities::paper_or_default(provider),
            color_mode,
            ..Self::default()
        }
    }

    /// Load a snapshot from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let snapshot = serde_json::from_slice(&bytes)
            .map_err(|e| PreviewError::Settings(format!("Failed to parse settings: {}", e)))?;
        Ok(snapshot)
    }

    /// Save a snapshot to a JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PreviewError::Settings(format!("Failed to serialize settings: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the snapshot
    pub fn validate(&self) -> Result<()> {
        if self.copies == 0 {
            return Err(PreviewError::Settings(
                "Copies must be at least 1".to_string(),
            ));
        }

        if let PaperSize::Custom {
            width_mm,
            height_mm,
        } = self.paper_size
        {
            if width_mm <= 0.0 || height_mm <= 0.0 {
                return Err(PreviewError::Settings(format!(
                    "Custom paper size {width_mm}x{height_mm}mm is not positive"
                )));
            }
        }

        if let ScalePolicy::Percent(percent) = self.scale {
            if !percent.is_finite()
                || percent < MIN_SCALE_PERCENT
                || percent > MAX_SCALE_PERCENT
            {
                return Err(PreviewError::Settings(format!(
                    "Scale must be between {MIN_SCALE_PERCENT}% and {MAX_SCALE_PERCENT}%"
                )));
            }
        }

        if let MarginMode::Custom(margin_pt) = self.margin {
            if !margin_pt.is_finite() || margin_pt < 0.0 {
                return Err(PreviewError::Settings(format!(
                    "Margin {margin_pt}pt must not be negative"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::*;
    use serde::{Deserialize, Serialize};

    // Manual implementations for types that don't derive Serialize/Deserialize
    impl Serialize for PaperSize {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            use serde::ser::SerializeStruct;
            match self {
                PaperSize::A3 => serializer.serialize_str("A3"),
                PaperSize::A4 => serializer.serialize_str("A4"),
                PaperSize::A5 => serializer.serialize_str("A5"),
                PaperSize::Letter => serializer.serialize_str("Letter"),
                PaperSize::Legal => serializer.serialize_str("Legal"),
                PaperSize::Tabloid => serializer.serialize_str("Tabloid"),
                PaperSize::Custom {
                    width_mm,
                    height_mm,
                } => {
                    let mut s = serializer.serialize_struct("Custom", 2)?;
                    s.serialize_field("width_mm", width_mm)?;
                    s.serialize_field("height_mm", height_mm)?;
                    s.end()
                }
            }
        }
    }

    impl<'de> Deserialize<'de> for PaperSize {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            use serde::de::{self, MapAccess, Visitor};
            use std::fmt;

            struct PaperSizeVisitor;

            impl<'de> Visitor<'de> for PaperSizeVisitor {
                type Value = PaperSize;

                fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                    formatter.write_str("a paper size")
                }

                fn visit_str<E>(self, value: &str) -> std::result::Result<PaperSize, E>
                where
                    E: de::Error,
                {
                    match value {
                        "A3" => Ok(PaperSize::A3),
                        "A4" => Ok(PaperSize::A4),
                        "A5" => Ok(PaperSize::A5),
                        "Letter" => Ok(PaperSize::Letter),
                        "Legal" => Ok(PaperSize::Legal),
                        "Tabloid" => Ok(PaperSize::Tabloid),
                        _ => Err(de::Error::unknown_variant(
                            value,
                            &["A3", "A4", "A5", "Letter", "Legal", "Tabloid", "Custom"],
                        )),
                    }
                }

                fn visit_map<M>(self, mut map: M) -> std::result::Result<PaperSize, M::Error>
                where
                    M: MapAccess<'de>,
                {
                    let mut width_mm = None;
                    let mut height_mm = None;

                    while let Some(key) = map.next_key::<String>()? {
                        match key.as_str() {
                            "width_mm" => width_mm = Some(map.next_value()?),
                            "height_mm" => height_mm = Some(map.next_value()?),
                            _ => {
                                let _: serde::de::IgnoredAny = map.next_value()?;
                            }
                        }
                    }

                    match (width_mm, height_mm) {
                        (Some(w), Some(h)) => Ok(PaperSize::Custom {
                            width_mm: w,
                            height_mm: h,
                        }),
                        _ => Err(de::Error::missing_field("width_mm or height_mm")),
                    }
                }
            }

            deserializer.deserialize_any(PaperSizeVisitor)
        }
    }

    impl Serialize for MarginMode {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            use serde::ser::SerializeStruct;
            match self {
                MarginMode::Default => serializer.serialize_str("Default"),
                MarginMode::None => serializer.serialize_str("None"),
                MarginMode::Minimum => serializer.serialize_str("Minimum"),
                MarginMode::Custom(points) => {
                    let mut s = serializer.serialize_struct("Custom", 1)?;
                    s.serialize_field("points", points)?;
                    s.end()
                }
            }
        }
    }

    impl<'de> Deserialize<'de> for MarginMode {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            use serde::de::{self, MapAccess, Visitor};
            use std::fmt;

            struct MarginModeVisitor;

            impl<'de> Visitor<'de> for MarginModeVisitor {
                type Value = MarginMode;

                fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                    formatter.write_str("a margin mode")
                }

                fn visit_str<E>(self, value: &str) -> std::result::Result<MarginMode, E>
                where
                    E: de::Error,
                {
                    match value {
                        "Default" => Ok(MarginMode::Default),
                        "None" => Ok(MarginMode::None),
                        "Minimum" => Ok(MarginMode::Minimum),
                        _ => Err(de::Error::unknown_variant(
                            value,
                            &["Default", "None", "Minimum", "Custom"],
                        )),
                    }
                }

                fn visit_map<M>(self, mut map: M) -> std::result::Result<MarginMode, M::Error>
                where
                    M: MapAccess<'de>,
                {
                    let mut points = None;
                    while let Some(key) = map.next_key::<String>()? {
                        match key.as_str() {
                            "points" => points = Some(map.next_value()?),
                            _ => {
                                let _: serde::de::IgnoredAny = map.next_value()?;
                            }
                        }
                    }

                    match points {
                        Some(p) => Ok(MarginMode::Custom(p)),
                        _ => Err(de::Error::missing_field("points")),
                    }
                }
            }

            deserializer.deserialize_any(MarginModeVisitor)
        }
    }

    impl Serialize for ScalePolicy {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            use serde::ser::SerializeStruct;
            match self {
                ScalePolicy::Auto => serializer.serialize_str("Auto"),
                ScalePolicy::Percent(percent) => {
                    let mut s = serializer.serialize_struct("Percent", 1)?;
                    s.serialize_field("percent", percent)?;
                    s.end()
                }
            }
        }
    }

    impl<'de> Deserialize<'de> for ScalePolicy {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            use serde::de::{self, MapAccess, Visitor};
            use std::fmt;

            struct ScalePolicyVisitor;

            impl<'de> Visitor<'de> for ScalePolicyVisitor {
                type Value = ScalePolicy;

                fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                    formatter.write_str("a scale policy")
                }

                fn visit_str<E>(self, value: &str) -> std::result::Result<ScalePolicy, E>
                where
                    E: de::Error,
                {
                    match value {
                        "Auto" => Ok(ScalePolicy::Auto),
                        _ => Err(de::Error::unknown_variant(value, &["Auto", "Percent"])),
                    }
                }

                fn visit_map<M>(self, mut map: M) -> std::result::Result<ScalePolicy, M::Error>
                where
                    M: MapAccess<'de>,
                {
                    let mut percent = None;
                    while let Some(key) = map.next_key::<String>()? {
                        match key.as_str() {
                            "percent" => percent = Some(map.next_value()?),
                            _ => {
                                let _: serde::de::IgnoredAny = map.next_value()?;
                            }
                        }
                    }

                    match percent {
                        Some(p) => Ok(ScalePolicy::Percent(p)),
                        _ => Err(de::Error::missing_field("percent")),
                    }
                }
            }

            deserializer.deserialize_any(ScalePolicyVisitor)
        }
    }

    impl Serialize for PageFilter {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            use serde::ser::SerializeStruct;
            match self {
                PageFilter::All => serializer.serialize_str("All"),
                PageFilter::CurrentPage(page) => {
                    let mut s = serializer.serialize_struct("CurrentPage", 1)?;
                    s.serialize_field("current_page", page)?;
                    s.end()
                }
                PageFilter::Custom(ranges) => {
                    let mut s = serializer.serialize_struct("Custom", 1)?;
                    s.serialize_field("ranges", ranges)?;
                    s.end()
                }
            }
        }
    }

    impl<'de> Deserialize<'de> for PageFilter {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            use serde::de::{self, MapAccess, Visitor};
            use std::fmt;

            struct PageFilterVisitor;

            impl<'de> Visitor<'de> for PageFilterVisitor {
                type Value = PageFilter;

                fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                    formatter.write_str("a page filter")
                }

                fn visit_str<E>(self, value: &str) -> std::result::Result<PageFilter, E>
                where
                    E: de::Error,
                {
                    match value {
                        "All" => Ok(PageFilter::All),
                        _ => Err(de::Error::unknown_variant(
                            value,
                            &["All", "CurrentPage", "Custom"],
                        )),
                    }
                }

                fn visit_map<M>(self, mut map: M) -> std::result::Result<PageFilter, M::Error>
                where
                    M: MapAccess<'de>,
                {
                    let mut current_page = None;
                    let mut ranges = None;

                    while let Some(key) = map.next_key::<String>()? {
                        match key.as_str() {
                            "current_page" => current_page = Some(map.next_value()?),
                            "ranges" => ranges = Some(map.next_value()?),
                            _ => {
                                let _: serde::de::IgnoredAny = map.next_value()?;
                            }
                        }
                    }

                    if let Some(page) = current_page {
                        Ok(PageFilter::CurrentPage(page))
                    } else if let Some(text) = ranges {
                        Ok(PageFilter::Custom(text))
                    } else {
                        Err(de::Error::missing_field("current_page or ranges"))
                    }
                }
            }

            deserializer.deserialize_any(PageFilterVisitor)
        }
    }

    // Simple string implementations for the remaining enums
    impl Serialize for ColorMode {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_str(match self {
                ColorMode::Color => "Color",
                ColorMode::Grayscale => "Grayscale",
                ColorMode::Monochrome => "Monochrome",
            })
        }
    }

    impl<'de> Deserialize<'de> for ColorMode {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            match s.as_str() {
                "Color" => Ok(ColorMode::Color),
                "Grayscale" => Ok(ColorMode::Grayscale),
                "Monochrome" => Ok(ColorMode::Monochrome),
                _ => Err(serde::de::Error::custom("Unknown color mode")),
            }
        }
    }

    impl Serialize for Duplex {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_str(match self {
                Duplex::Off => "Off",
                Duplex::LongEdge => "LongEdge",
                Duplex::ShortEdge => "ShortEdge",
            })
        }
    }

    impl<'de> Deserialize<'de> for Duplex {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            match s.as_str() {
                "Off" => Ok(Duplex::Off),
                "LongEdge" => Ok(Duplex::LongEdge),
                "ShortEdge" => Ok(Duplex::ShortEdge),
                _ => Err(serde::de::Error::custom("Unknown duplex mode")),
            }
        }
    }

    impl Serialize for PageOrder {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_str(match self {
                PageOrder::RowMajor => "RowMajor",
                PageOrder::RowMajorReversed => "RowMajorReversed",
                PageOrder::ColumnMajor => "ColumnMajor",
                PageOrder::ColumnMajorReversed => "ColumnMajorReversed",
            })
        }
    }

    impl<'de> Deserialize<'de> for PageOrder {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            match s.as_str() {
                "RowMajor" => Ok(PageOrder::RowMajor),
                "RowMajorReversed" => Ok(PageOrder::RowMajorReversed),
                "ColumnMajor" => Ok(PageOrder::ColumnMajor),
                "ColumnMajorReversed" => Ok(PageOrder::ColumnMajorReversed),
                _ => Err(serde::de::Error::custom("Unknown page order")),
            }
        }
    }

    // Pages-per-sheet round-trips as its cell count
    impl Serialize for PagesPerSheet {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_u64(self.count() as u64)
        }
    }

    impl<'de> Deserialize<'de> for PagesPerSheet {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let count = u64::deserialize(deserializer)?;
            PagesPerSheet::from_count(count as usize).ok_or_else(|| {
                serde::de::Error::custom(format!(
                    "Pages per sheet must be one of 1, 2, 4, 6, 9, 16 (got {count})"
                ))
            })
        }
    }
} // end of serde_impls module
