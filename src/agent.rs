// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! User-agent string templating
//!
//! A `UserAgent` describes the browser to impersonate; `create()` renders the
//! string real versions of that browser send. Unknown names fall back to a
//! generic `name/version (os)` form.

use serde::{Deserialize, Serialize};

/// Description of the browser to announce
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAgent {
    /// Browser name, matched case-insensitively against the known templates
    pub name: String,
    /// Browser version; empty means the template's default
    pub version: String,
    pub os_name: String,
    pub os_version: String,
    /// Extra tokens placed inside the platform parentheses
    pub comments: Vec<String>,
}

const WINDOWS_NAME: &str = "Windows NT";
const WINDOWS_VERSION: &str = "6.3";

fn default_version(name: &str) -> &'static str {
    match name {
        "chrome" => "37.0.2049.0",
        "firefox" => "31.0",
        "msie" => "10.0",
        "opera" => "12.14",
        "safari" => "6.0",
        "aol" => "9.7",
        "konqueror" => "4.9",
        "netscape" => "9.0.0.6",
        "lynx" => "2.8.8dev.3",
        _ => "",
    }
}

impl UserAgent {
    /// Agent with the given name on the given platform, no comments
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        os_name: impl Into<String>,
        os_version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            os_name: os_name.into(),
            os_version: os_version.into(),
            comments: Vec::new(),
        }
    }

    /// Add a comment token
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comments.push(comment.into());
        self
    }

    /// Render the user-agent string
    pub fn create(&self) -> String {
        let name = self.name.to_ascii_lowercase();
        let version = if self.version.is_empty() {
            default_version(&name).to_string()
        } else {
            self.version.clone()
        };
        let major = version.split('.').next().unwrap_or("");
        let os = self.os();
        let comments: String = self.comments.iter().map(|c| format!("; {}", c)).collect();

        match name.as_str() {
            "chrome" => format!(
                "Mozilla/5.0 ({}{}) Chrome/{} Safari/537.36",
                os, comments, version
            ),
            "firefox" => format!(
                "Mozilla/5.0 ({}{}; rv:{}) Gecko/20100101 Firefox/{}",
                os, comments, version, version
            ),
            "msie" => format!(
                "Mozilla/5.0 (compatible; MSIE {}.0; {}{}; Trident/5.0; .NET CLR 3.5.30729)",
                major, os, comments
            ),
            "opera" => format!(
                "Opera/9.80 ({}; U{}) Presto/2.9.181 Version/{}",
                os, comments, version
            ),
            "safari" => format!(
                "Mozilla/5.0 (Macintosh; {}{}) AppleWebKit/536.26 (KHTML, like Gecko) Version/{} Safari/8536.25",
                os, comments, version
            ),
            "aol" => format!(
                "Mozilla/5.0 (compatible; MSIE 9.0; AOL {}; AOLBuild 4343.19; {}; WOW64; Trident/5.0; FunWebProducts{})",
                version, os, comments
            ),
            "konqueror" => format!(
                "Mozilla/5.0 (compatible; Konqueror/{}.0; {}{}) KHTML/4.0.3 (like Gecko)",
                major, self.os_name, comments
            ),
            "netscape" => format!(
                "Mozilla/5.0 (Windows NT; U; {}; rv:1.9.2.4{}) Gecko/20070321 Netscape/{}",
                os, comments, version
            ),
            "lynx" => format!("Lynx/{} libwww-FM/2.14 SSL-MM/1.4.1", version),
            _ => format!("{}/{} ({}{})", self.name, version, os, comments),
        }
    }

    fn os(&self) -> String {
        match (self.os_name.is_empty(), self.os_version.is_empty()) {
            (false, false) => format!("{} {}", self.os_name, self.os_version),
            (false, true) => self.os_name.clone(),
            (true, false) => self.os_version.clone(),
            (true, true) => String::new(),
        }
    }
}

impl Default for UserAgent {
    /// `skiff/<version> (<os>; <arch>)`
    fn default() -> Self {
        Self::new(
            "skiff",
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS,
            "",
        )
        .comment(std::env::consts::ARCH)
    }
}

impl std::fmt::Display for UserAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.create())
    }
}

fn windows(name: &str) -> String {
    UserAgent::new(name, "", WINDOWS_NAME, WINDOWS_VERSION)
        .comment("x64")
        .create()
}

/// Chrome on 64-bit Windows
pub fn chrome() -> String {
    windows("chrome")
}

/// Firefox on 64-bit Windows
pub fn firefox() -> String {
    windows("firefox")
}

/// Internet Explorer on 64-bit Windows
pub fn msie() -> String {
    windows("msie")
}

/// Opera on 64-bit Windows
pub fn opera() -> String {
    windows("opera")
}

/// Safari on OS X
pub fn safari() -> String {
    UserAgent::new("safari", "", "Intel Mac OS X", "10_6_8").create()
}

/// AOL on 64-bit Windows
pub fn aol() -> String {
    windows("aol")
}

/// Konqueror on Linux
pub fn konqueror() -> String {
    UserAgent::new("konqueror", "", "Linux", "").create()
}

/// Netscape on Windows
pub fn netscape() -> String {
    UserAgent::new("netscape", "", WINDOWS_NAME, "6.1")
        .comment("en-US")
        .create()
}

/// Lynx
pub fn lynx() -> String {
    UserAgent::new("lynx", "", "Linux", "").create()
}
