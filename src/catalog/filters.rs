use crate::foundation::error::{BoothError, BoothResult};

/// A capture filter: a cosmetic style applied to the live feed and review thumbnails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct CaptureFilter {
    /// Stable key carried from capture to the editor.
    pub key: &'static str,
    /// Label shown in the filter bar.
    pub display_name: &'static str,
    /// CSS-like filter descriptor, e.g. `"sepia(50%) contrast(150%)"`.
    pub style: &'static str,
}

/// The key of the filter selected before any user choice.
pub const DEFAULT_FILTER_KEY: &str = "normal";

/// Built-in filters, in filter-bar order.
pub static FILTERS: [CaptureFilter; 8] = [
    CaptureFilter {
        key: "normal",
        display_name: "Normal",
        style: "none",
    },
    CaptureFilter {
        key: "bw",
        display_name: "B&W",
        style: "grayscale(100%)",
    },
    CaptureFilter {
        key: "sepia",
        display_name: "Sepia",
        style: "sepia(100%)",
    },
    CaptureFilter {
        key: "vintage",
        display_name: "Vintage",
        style: "sepia(50%) contrast(150%) saturate(80%)",
    },
    CaptureFilter {
        key: "soft",
        display_name: "Soft",
        style: "brightness(110%) contrast(90%) saturate(80%)",
    },
    CaptureFilter {
        key: "noir",
        display_name: "Noir",
        style: "grayscale(100%) contrast(150%) brightness(80%)",
    },
    CaptureFilter {
        key: "vivid",
        display_name: "Vivid",
        style: "saturate(200%) contrast(110%)",
    },
    CaptureFilter {
        key: "ocean",
        display_name: "Ocean",
        style: "sepia(20%) hue-rotate(180deg) saturate(140%)",
    },
];

/// Look up a built-in filter by key.
pub fn filter_by_key(key: &str) -> Option<&'static CaptureFilter> {
    FILTERS.iter().find(|f| f.key == key)
}

/// One function of a filter descriptor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterFn {
    /// `grayscale(amount)`, amount in `[0, 1]`.
    Grayscale(f32),
    /// `sepia(amount)`, amount in `[0, 1]`.
    Sepia(f32),
    /// `saturate(amount)`, 1 = identity.
    Saturate(f32),
    /// `contrast(amount)`, 1 = identity.
    Contrast(f32),
    /// `brightness(amount)`, 1 = identity.
    Brightness(f32),
    /// `hue-rotate(degrees)`.
    HueRotate(f32),
}

impl FilterFn {
    /// Row-major 4x5 matrix over straight RGBA in `[0, 1]` (last column is the offset).
    pub fn matrix(self) -> [f32; 20] {
        match self {
            Self::Grayscale(a) => {
                let s = 1.0 - a.clamp(0.0, 1.0);
                rgb_matrix([
                    [0.2126 + 0.7874 * s, 0.7152 - 0.7152 * s, 0.0722 - 0.0722 * s],
                    [0.2126 - 0.2126 * s, 0.7152 + 0.2848 * s, 0.0722 - 0.0722 * s],
                    [0.2126 - 0.2126 * s, 0.7152 - 0.7152 * s, 0.0722 + 0.9278 * s],
                ])
            }
            Self::Sepia(a) => {
                let s = 1.0 - a.clamp(0.0, 1.0);
                rgb_matrix([
                    [0.393 + 0.607 * s, 0.769 - 0.769 * s, 0.189 - 0.189 * s],
                    [0.349 - 0.349 * s, 0.686 + 0.314 * s, 0.168 - 0.168 * s],
                    [0.272 - 0.272 * s, 0.534 - 0.534 * s, 0.131 + 0.869 * s],
                ])
            }
            Self::Saturate(s) => rgb_matrix([
                [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
                [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
                [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
            ]),
            Self::HueRotate(deg) => {
                let (sin, cos) = deg.to_radians().sin_cos();
                rgb_matrix([
                    [
                        0.213 + cos * 0.787 - sin * 0.213,
                        0.715 - cos * 0.715 - sin * 0.715,
                        0.072 - cos * 0.072 + sin * 0.928,
                    ],
                    [
                        0.213 - cos * 0.213 + sin * 0.143,
                        0.715 + cos * 0.285 + sin * 0.140,
                        0.072 - cos * 0.072 - sin * 0.283,
                    ],
                    [
                        0.213 - cos * 0.213 - sin * 0.787,
                        0.715 - cos * 0.715 + sin * 0.715,
                        0.072 + cos * 0.928 + sin * 0.072,
                    ],
                ])
            }
            Self::Brightness(a) => {
                let mut m = IDENTITY_MATRIX;
                m[0] = a;
                m[6] = a;
                m[12] = a;
                m
            }
            Self::Contrast(a) => {
                let off = 0.5 - 0.5 * a;
                let mut m = IDENTITY_MATRIX;
                m[0] = a;
                m[4] = off;
                m[6] = a;
                m[9] = off;
                m[12] = a;
                m[14] = off;
                m
            }
        }
    }
}

/// Identity 4x5 color matrix.
pub const IDENTITY_MATRIX: [f32; 20] = [
    1.0, 0.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 0.0, 1.0, 0.0,
];

fn rgb_matrix(rows: [[f32; 3]; 3]) -> [f32; 20] {
    let mut m = IDENTITY_MATRIX;
    for (r, row) in rows.iter().enumerate() {
        m[r * 5..r * 5 + 3].copy_from_slice(row);
    }
    m
}

/// Parse a CSS-like filter descriptor into its functions, in application order.
///
/// `"none"` and the empty string parse to an empty list.
pub fn parse_filter_style(style: &str) -> BoothResult<Vec<FilterFn>> {
    let style = style.trim();
    if style.is_empty() || style == "none" {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    let mut rest = style;
    while !rest.is_empty() {
        let open = rest
            .find('(')
            .ok_or_else(|| BoothError::validation(format!("filter '{style}': expected '('")))?;
        let close = rest[open..]
            .find(')')
            .map(|i| open + i)
            .ok_or_else(|| BoothError::validation(format!("filter '{style}': expected ')'")))?;
        let name = rest[..open].trim();
        let arg = rest[open + 1..close].trim();
        out.push(parse_fn(name, arg)?);
        rest = rest[close + 1..].trim_start();
    }
    Ok(out)
}

fn parse_fn(name: &str, arg: &str) -> BoothResult<FilterFn> {
    let amount = || parse_amount(arg);
    Ok(match name {
        "grayscale" => FilterFn::Grayscale(amount()?),
        "sepia" => FilterFn::Sepia(amount()?),
        "saturate" => FilterFn::Saturate(amount()?),
        "contrast" => FilterFn::Contrast(amount()?),
        "brightness" => FilterFn::Brightness(amount()?),
        "hue-rotate" => {
            let deg = arg
                .strip_suffix("deg")
                .unwrap_or(arg)
                .trim()
                .parse::<f32>()
                .map_err(|e| BoothError::validation(format!("hue-rotate({arg}): {e}")))?;
            FilterFn::HueRotate(deg)
        }
        other => {
            return Err(BoothError::validation(format!(
                "unsupported filter function '{other}'"
            )));
        }
    })
}

fn parse_amount(arg: &str) -> BoothResult<f32> {
    let (num, scale) = match arg.strip_suffix('%') {
        Some(n) => (n, 0.01),
        None => (arg, 1.0),
    };
    let v = num
        .trim()
        .parse::<f32>()
        .map_err(|e| BoothError::validation(format!("filter amount '{arg}': {e}")))?;
    if !v.is_finite() || v < 0.0 {
        return Err(BoothError::validation(format!(
            "filter amount '{arg}' must be finite and >= 0"
        )));
    }
    Ok(v * scale)
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/filters.rs"]
mod tests;
