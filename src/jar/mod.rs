// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Session storage: navigation history and bookmarks

mod bookmarks;
mod history;

pub use bookmarks::{BookmarksJar, FileBookmarks, MemoryBookmarks};
pub use history::History;
