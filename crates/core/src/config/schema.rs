//! Configuration schema definitions

use crate::error::{Result, RouteSearchError};
use crate::map::{
    BaseMap, MapStyle, PolylineStyle, DEFAULT_BANNER, DEFAULT_CENTER, DEFAULT_ZOOM, DEPOT,
    FIT_PADDING_PX, FOCUS_ZOOM,
};
use rutekita_api_client::credentials::DEFAULT_TOKEN_VAR;
use rutekita_geo::GeoPoint;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Highest zoom level the tile providers serve
pub const MAX_ZOOM: u8 = 19;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigSchema {
    #[serde(default)]
    pub map: MapConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

impl ConfigSchema {
    /// Reject values the map or workflow cannot use
    pub fn validate(&self) -> Result<()> {
        let map = &self.map;
        if !map.depot.point().is_valid() {
            return Err(RouteSearchError::config(format!(
                "depot '{}' is not a valid coordinate ({}, {})",
                map.depot.name, map.depot.latitude, map.depot.longitude
            )));
        }
        if !map.center.is_valid() {
            return Err(RouteSearchError::config(format!("map center {} is out of range", map.center)));
        }
        for (name, zoom) in [("zoom", map.zoom), ("focus_zoom", map.focus_zoom)] {
            if zoom > MAX_ZOOM {
                return Err(RouteSearchError::config(format!(
                    "map.{name} = {zoom} exceeds the maximum of {MAX_ZOOM}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&map.polyline.opacity) {
            return Err(RouteSearchError::config(format!(
                "map.polyline.opacity = {} must be between 0 and 1",
                map.polyline.opacity
            )));
        }
        if let Some(url) = &self.api.base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(RouteSearchError::config(format!(
                    "api.base_url '{url}' must start with http:// or https://"
                )));
            }
        }
        Ok(())
    }
}

/// `[map]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MapConfig {
    pub base_map: BaseMap,

    /// Shown while no endpoint is set
    pub center: GeoPoint,

    pub zoom: u8,

    /// Zoom used when centering on a single endpoint
    pub focus_zoom: u8,

    pub fit_padding_px: u32,

    pub depot: DepotConfig,

    pub polyline: PolylineStyle,

    /// `{endpoint}` is replaced by "Origin" or "Destination"
    pub banner: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            base_map: BaseMap::default(),
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            focus_zoom: FOCUS_ZOOM,
            fit_padding_px: FIT_PADDING_PX,
            depot: DepotConfig::default(),
            polyline: PolylineStyle::default(),
            banner: DEFAULT_BANNER.to_string(),
        }
    }
}

impl MapConfig {
    /// Style for the map surface; icons are always the stock pair
    pub fn style(&self) -> MapStyle {
        MapStyle {
            base_map: self.base_map,
            default_center: self.center,
            default_zoom: self.zoom,
            focus_zoom: self.focus_zoom,
            fit_padding_px: self.fit_padding_px,
            polyline: self.polyline.clone(),
            banner_template: self.banner.clone(),
            ..MapStyle::default()
        }
    }
}

/// Home location used as the default origin
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepotConfig {
    #[serde(default = "default_depot_name")]
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for DepotConfig {
    fn default() -> Self {
        Self {
            name: default_depot_name(),
            latitude: DEPOT.latitude,
            longitude: DEPOT.longitude,
        }
    }
}

impl DepotConfig {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

fn default_depot_name() -> String {
    "Ubhara".to_string()
}

/// `[api]` section; unset fields fall back to the environment
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub skip_ngrok_warning: Option<bool>,
}

/// `[session]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    /// Environment variable checked first for a bearer token
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Session document written by the login flow; defaults to the user's
    /// data directory
    #[serde(default)]
    pub session_file: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_env: default_token_env(),
            session_file: None,
        }
    }
}

impl SessionConfig {
    /// Configured session file, or `<data dir>/rutekita/session.json`
    pub fn session_path(&self) -> Option<PathBuf> {
        self.session_file
            .clone()
            .or_else(|| dirs::data_local_dir().map(|d| d.join("rutekita").join("session.json")))
    }
}

fn default_token_env() -> String {
    DEFAULT_TOKEN_VAR.to_string()
}
