/// Initial window / engine configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// Optional path to the skull model; a missing file is tolerated (the
    /// geometry is simply absent).
    pub model_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Tidewater".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
            model_path: Some("assets/models/skull.txt".to_string()),
        }
    }
}

/// Entry point — builder pattern over [`AppConfig`].
pub struct App {
    config: AppConfig,
}

impl App {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.config.title = title.to_string();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.config.vsync = vsync;
        self
    }

    pub fn with_model_path(mut self, path: Option<&str>) -> Self {
        self.config.model_path = path.map(str::to_string);
        self
    }

    /// Runs the main event loop until the window closes.
    pub fn run(self) -> anyhow::Result<()> {
        crate::runner::run_internal(self.config)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
