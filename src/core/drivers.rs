//! MIME type to Intake driver lookup.
//!
//! The table is a plain value handed to the converter. Lookups are exact
//! string matches on the media type as written in the STAC document,
//! parameters included.

use std::collections::BTreeMap;

/// Built-in media type -> driver mappings
const BUILTIN_DRIVERS: &[(&str, &str)] = &[
    ("application/netcdf", "netcdf"),
    ("application/x-netcdf", "netcdf"),
    ("application/parquet", "parquet"),
    ("application/x-parquet", "parquet"),
    ("application/x-hdf", "netcdf"),
    ("application/x-hdf5", "netcdf"),
    ("application/rss+xml", "textfiles"),
    ("application/geo+json", "geopandas"),
    ("application/json", "textfiles"),
    ("application/xml", "textfiles"),
    ("application/zip", "textfiles"),
    ("application/x-zarr", "zarr"),
    ("image/jp2", "rasterio"),
    ("image/png", "xarray_image"),
    ("image/jpg", "xarray_image"),
    ("image/jpeg", "xarray_image"),
    ("image/tiff", "rasterio"),
    ("image/tiff; application=geotiff", "rasterio"),
    ("image/tiff; application=geotiff; profile=cloud-optimized", "rasterio"),
    ("image/x.geotiff", "rasterio"),
    ("image/vnd.stac.geotiff", "rasterio"),
    ("image/vnd.stac.geotiff; cloud-optimized=true", "rasterio"),
    ("text/xml", "textfiles"),
    ("text/plain", "textfiles"),
    ("text/html", "textfiles"),
];

/// Outcome of a driver lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverResolution<'a> {
    /// The table has a driver for this media type
    Resolved(&'a str),
    /// No entry; carries the media type as given
    Unmapped(&'a str),
}

impl<'a> DriverResolution<'a> {
    /// Driver name, passing unmapped media types through verbatim
    pub fn driver_name(&self) -> &'a str {
        match *self {
            DriverResolution::Resolved(driver) | DriverResolution::Unmapped(driver) => driver,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, DriverResolution::Resolved(_))
    }
}

/// What the converter does with a media type the table does not know
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnmappedPolicy {
    /// Use the media type itself as the driver name
    #[default]
    PassThrough,
    /// Abort the conversion
    Reject,
}

/// Immutable media type -> driver table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverTable {
    entries: BTreeMap<String, String>,
}

impl Default for DriverTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DriverTable {
    /// Table with the built-in mappings
    pub fn builtin() -> Self {
        BUILTIN_DRIVERS.iter().copied().collect()
    }

    /// Table with no mappings at all
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Add or replace one mapping
    pub fn with_driver(mut self, media_type: impl Into<String>, driver: impl Into<String>) -> Self {
        self.entries.insert(media_type.into(), driver.into());
        self
    }

    /// Layer `overrides` on top of this table
    pub fn merged<I, K, V>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.entries
            .extend(overrides.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Look up the driver for a media type
    pub fn resolve<'a>(&'a self, media_type: &'a str) -> DriverResolution<'a> {
        match self.entries.get(media_type) {
            Some(driver) => DriverResolution::Resolved(driver),
            None => DriverResolution::Unmapped(media_type),
        }
    }

    /// All mappings, sorted by media type
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DriverTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::empty().merged(iter)
    }
}
