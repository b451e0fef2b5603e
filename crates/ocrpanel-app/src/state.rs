use anyhow::Context;
use ocrpanel_api::PanelClient;
use ocrpanel_config::Config;
use ocrpanel_core::ThemeStore;

pub struct AppState {
    pub config: Config,
    pub client: PanelClient,
    pub theme_store: ThemeStore,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let client = PanelClient::new(config.network.base_url(), config.network.request_timeout())
            .context("Failed to create REST client")?;
        let theme_store = ThemeStore::new(config.ui.preferences_file());

        Ok(Self {
            config,
            client,
            theme_store,
        })
    }
}
