//! Bridge operations and their path-and-query rendering.

use std::fmt;

/// Output rendering for a channel fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChannelFormat {
    /// Tab-separated item listing.
    #[default]
    Tabular,
    /// dshell document rendering.
    Dshell,
}

/// Operations the bridge accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Fetch channel content for a feed URL.
    FetchChannel { link: String, format: ChannelFormat },
    /// Query the bridge's date/time, shifted by a timezone offset in hours.
    DateTime { tz: i16 },
}

impl Operation {
    /// Renders the path-and-query string sent as the request body.
    ///
    /// The link is embedded verbatim, no escaping; callers are responsible
    /// for a well-formed value.
    pub fn path(&self) -> String {
        match self {
            Operation::FetchChannel {
                link,
                format: ChannelFormat::Tabular,
            } => format!("/openbbs?link={link}"),
            Operation::FetchChannel {
                link,
                format: ChannelFormat::Dshell,
            } => format!("/dshell?link={link}"),
            Operation::DateTime { tz } => format!("/datetime?tz={tz}"),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
