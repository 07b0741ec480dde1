/// Tile style used for the results map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapStyle {
    #[default]
    Standard,
    Light,
    Dark,
    Topo,
}

impl MapStyle {
    pub const ALL: [MapStyle; 4] = [
        MapStyle::Standard,
        MapStyle::Light,
        MapStyle::Dark,
        MapStyle::Topo,
    ];

    /// Unknown keys render with the standard OpenStreetMap tiles
    pub fn from_key(key: &str) -> MapStyle {
        match key.trim().to_ascii_lowercase().as_str() {
            "light" => MapStyle::Light,
            "dark" => MapStyle::Dark,
            "topo" => MapStyle::Topo,
            _ => MapStyle::Standard,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            MapStyle::Standard => "standard",
            MapStyle::Light => "light",
            MapStyle::Dark => "dark",
            MapStyle::Topo => "topo",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MapStyle::Standard => "Standard",
            MapStyle::Light => "Light",
            MapStyle::Dark => "Dark",
            MapStyle::Topo => "Topographic",
        }
    }

    /// Leaflet tile URL template
    pub fn tile_url(self) -> &'static str {
        match self {
            MapStyle::Standard => "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            MapStyle::Light => "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png",
            MapStyle::Dark => "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png",
            MapStyle::Topo => "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
        }
    }

    pub fn attribution(self) -> &'static str {
        match self {
            MapStyle::Standard => "&copy; OpenStreetMap contributors",
            MapStyle::Light | MapStyle::Dark => "&copy; OpenStreetMap contributors &copy; CARTO",
            MapStyle::Topo => "&copy; OpenStreetMap contributors, SRTM | &copy; OpenTopoMap",
        }
    }
}
