use orb::OrbConfig;

/// Anti-aliasing policy for the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Antialiasing {
    /// Pick the highest sample count supported by the surface format.
    Auto,
    /// Disable MSAA and render directly into the swapchain.
    Off,
    /// Request a specific MSAA sample count (clamped to what the device supports).
    Samples(u32),
}

impl Default for Antialiasing {
    fn default() -> Self {
        Self::Auto
    }
}

/// Immutable configuration passed to the renderer at start-up.
///
/// `RendererConfig` mirrors CLI flags: the initial window size, how the
/// swapchain is multisampled, and the orb parameters handed to the
/// component.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Initial window size in logical pixels.
    pub window_size: (u32, u32),
    /// Window title.
    pub title: String,
    /// Anti-aliasing mode requested by the caller.
    pub antialiasing: Antialiasing,
    /// Look and behaviour of the orb itself.
    pub orb: OrbConfig,
}

impl Default for RendererConfig {
    /// Provides a 720p window with the stock orb.
    fn default() -> Self {
        Self {
            window_size: (1280, 720),
            title: "Nixate Orb".to_string(),
            antialiasing: Antialiasing::default(),
            orb: OrbConfig::default(),
        }
    }
}
