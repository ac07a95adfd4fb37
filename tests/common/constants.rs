//! Shared constants for end-to-end tests
//!
//! When the fixture dataset changes, update only this file.

/// Header of a complete listening export
pub const CSV_HEADER: &str =
    "artist_name,album_name,track_name,track_id,album_release_date,explicit";

/// Seed for the timestamp generator, so event times are reproducible
pub const TEST_SEED: u64 = 20140501;

// ============================================================================
// Rows
// ============================================================================

pub const SIA_ROW: &str = "Sia,1000 Forms of Fear,Chandelier,t1,2014-05-01,";
pub const SIA_EXPLICIT_ROW: &str = "Sia,1000 Forms of Fear,Elastic Heart,t2,2014-05-01,True";
pub const ADELE_ROW: &str = "Adele,25,Hello,t3,2015-11-20,0";
pub const DAFT_PUNK_ROW: &str = "Daft Punk,Random Access Memories,Get Lucky,t4,2013-05-17,yes";

/// Released before the window opens
pub const OLD_ROW: &str = "Oasis,Morning Glory,Wonderwall,t5,1999-01-01,";

/// Artist is whitespace only
pub const BLANK_ARTIST_ROW: &str = "   ,Nameless,Ghost,t6,2014-01-01,";

/// No release date at all
pub const UNDATED_ROW: &str = "Nobody,Untitled,Silence,t7,,";
