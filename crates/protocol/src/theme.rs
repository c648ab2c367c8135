use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the backend's active theme.
///
/// Only figure chrome is themed. Data cells carry explicit colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,
    AxisLine,
    TickLine,

    TextPrimary,
    TextSecondary,
}
