use serde::{Deserialize, Serialize};
use tandem_common::Color;

/// Shading model requested from the rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    #[default]
    Basic,
    Lambert,
    Phong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

/// Material descriptor. Unset fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDesc {
    pub kind: MaterialKind,
    pub color: Color,
    pub opacity: f32,
    pub transparent: bool,
    pub wireframe: bool,
    pub side: Side,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            kind: MaterialKind::Basic,
            color: Color::WHITE,
            opacity: 1.0,
            transparent: false,
            wireframe: false,
            side: Side::Front,
        }
    }
}

impl MaterialDesc {
    pub fn with_color(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_material() {
        let m: MaterialDesc =
            serde_json::from_str(r#"{"kind": "phong", "color": 255, "side": "double"}"#).unwrap();
        assert_eq!(m.kind, MaterialKind::Phong);
        assert_eq!(m.color, Color(0x0000ff));
        assert_eq!(m.side, Side::Double);
        assert_eq!(m.opacity, 1.0);
    }
}
