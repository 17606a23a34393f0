//! Resource URL parsing.
//!
//! URLs follow `protocol://category/name/?key=value&key2=value2`. The cache
//! never looks inside a URL; only providers parse them.

use crate::error::{ResourceError, ResourceResult};

/// A resource URL split into its parts.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceUrl<'a> {
    raw: &'a str,
    protocol: &'a str,
    category: &'a str,
    name: &'a str,
    params: Vec<(&'a str, String)>,
}

impl<'a> ResourceUrl<'a> {
    /// Split `raw` into protocol, category, name and query parameters.
    ///
    /// Missing parts come back empty; parsing itself never fails.
    pub fn parse(raw: &'a str) -> Self {
        let (path, query) = match raw.split_once('?') {
            Some((path, query)) => (path, query),
            None => (raw, ""),
        };
        let (protocol, rest) = match path.split_once("://") {
            Some((protocol, rest)) => (protocol, rest),
            None => ("", path),
        };
        let mut segments = rest.split('/').filter(|s| !s.is_empty());
        let category = segments.next().unwrap_or("");
        let name = segments.next().unwrap_or("");

        let params = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                let value = urlencoding::decode(value)
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|_| value.to_string());
                (key, value)
            })
            .collect();

        Self {
            raw,
            protocol,
            category,
            name,
            params,
        }
    }

    /// The full URL.
    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    /// Scheme before `://`, or empty.
    pub fn protocol(&self) -> &'a str {
        self.protocol
    }

    /// First path segment, e.g. `mesh`.
    pub fn category(&self) -> &'a str {
        self.category
    }

    /// Second path segment, e.g. `uvsphere`.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Raw value of a query parameter. The first occurrence wins.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Integer query parameter; `Ok(None)` when absent.
    pub fn param_int(&self, key: &str) -> ResourceResult<Option<i64>> {
        self.param(key)
            .map(|v| {
                v.trim().parse::<i64>().map_err(|_| {
                    ResourceError::malformed(self.raw, format!("parameter '{key}' is not an integer: '{v}'"))
                })
            })
            .transpose()
    }

    /// Float query parameter; `Ok(None)` when absent.
    pub fn param_float(&self, key: &str) -> ResourceResult<Option<f32>> {
        self.param(key)
            .map(|v| {
                v.trim()
                    .parse::<f32>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .ok_or_else(|| {
                        ResourceError::malformed(self.raw, format!("parameter '{key}' is not a number: '{v}'"))
                    })
            })
            .transpose()
    }
}
