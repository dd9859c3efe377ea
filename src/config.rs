use clap::ValueEnum;
use famiboy_core::host::DEFAULT_QUEUE_CAPACITY;
use famiboy_core::{ApuConfig, BusQueue, HostRegion, UpdateCadence};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Cadence {
    #[default]
    AllChannels,
    QuarterTick,
    ChannelPair,
    PulsePriority,
}

impl From<Cadence> for UpdateCadence {
    fn from(cadence: Cadence) -> Self {
        match cadence {
            Cadence::AllChannels => UpdateCadence::AllChannels,
            Cadence::QuarterTick => UpdateCadence::QuarterTick,
            Cadence::ChannelPair => UpdateCadence::ChannelPair,
            Cadence::PulsePriority => UpdateCadence::PulsePriority,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    #[default]
    Ntsc,
    Pal,
}

impl From<Region> for HostRegion {
    fn from(region: Region) -> Self {
        match region {
            Region::Ntsc => HostRegion::Ntsc,
            Region::Pal => HostRegion::Pal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AppConfig {
    pub cadence: Cadence,
    pub region: Region,
    /// Host writes buffered per frame before new ones are dropped.
    pub queue_capacity: usize,
    /// Skip host writes that repeat the register's last value.
    pub differential: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cadence: Cadence::default(),
            region: Region::default(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            differential: true,
        }
    }
}

impl AppConfig {
    pub fn apu_config(&self) -> ApuConfig {
        ApuConfig {
            cadence: self.cadence.into(),
            region: self.region.into(),
        }
    }

    pub fn bus_queue(&self) -> BusQueue {
        BusQueue::new(self.queue_capacity).with_differential(self.differential)
    }
}

pub fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("famiboy").join("apu.toml");
        }
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("famiboy").join("apu.toml");
    }

    if let Some(home) = std::env::var_os("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join("famiboy")
            .join("apu.toml");
    }

    PathBuf::from("apu.toml")
}

pub fn load_from_file(path: &Path) -> AppConfig {
    let text = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(_) => return AppConfig::default(),
    };

    match toml::from_str::<AppConfig>(&text) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(
                "Failed to parse APU config {}: {e}; using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

pub fn save_to_file(path: &Path, cfg: &AppConfig) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let text = toml::to_string_pretty(cfg).unwrap_or_else(|_| String::new());
    std::fs::write(path, text)
}
