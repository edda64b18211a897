/// Render configuration, fixed at startup.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub vsync: bool,
    pub power_preference: wgpu::PowerPreference,
    pub clear_color: wgpu::Color,
    pub depth_format: wgpu::TextureFormat,
    /// MSAA sample count. Common values: 1 (off), 2, 4.
    pub msaa_samples: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            vsync: true,
            power_preference: wgpu::PowerPreference::HighPerformance,
            clear_color: wgpu::Color {
                r: 0.013,
                g: 0.015,
                b: 0.022,
                a: 1.0,
            },
            depth_format: wgpu::TextureFormat::Depth32Float,
            msaa_samples: 4,
        }
    }
}
