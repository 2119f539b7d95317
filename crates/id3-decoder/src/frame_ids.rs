use id3_wire::FrameId;

/// Declares the frame id table: one constant per id in [`ids`], plus the
/// description lookup used by [`frame_name`].
macro_rules! frame_ids {
    ($($id:ident => $desc:literal,)+) => {
        /// Identifiers declared by ID3v2.3 and ID3v2.4.
        pub mod ids {
            use id3_wire::FrameId;

            $(
                #[doc = $desc]
                pub const $id: FrameId = FrameId::new(*super::id_bytes(stringify!($id)));
            )+
        }

        const TABLE: &[(FrameId, &str)] = &[$((ids::$id, $desc),)+];
    };
}

const fn id_bytes(name: &str) -> &[u8; 4] {
    match name.as_bytes().first_chunk::<4>() {
        Some(bytes) if name.len() == 4 => bytes,
        _ => panic!("frame id must be 4 characters"),
    }
}

frame_ids! {
    AENC => "Audio encryption",
    APIC => "Attached picture",
    ASPI => "Audio seek point index",
    COMM => "Comments",
    COMR => "Commercial frame",
    ENCR => "Encryption method registration",
    EQU2 => "Equalisation (2)",
    EQUA => "Equalisation",
    ETCO => "Event timing codes",
    GEOB => "General encapsulated object",
    GRID => "Group identification registration",
    IPLS => "Involved people list",
    LINK => "Linked information",
    MCDI => "Music CD identifier",
    MLLT => "MPEG location lookup table",
    OWNE => "Ownership frame",
    PCNT => "Play counter",
    POPM => "Popularimeter",
    POSS => "Position synchronisation frame",
    PRIV => "Private frame",
    RBUF => "Recommended buffer size",
    RVA2 => "Relative volume adjustment (2)",
    RVAD => "Relative volume adjustment",
    RVRB => "Reverb",
    SEEK => "Seek frame",
    SIGN => "Signature frame",
    SYLT => "Synchronised lyric/text",
    SYTC => "Synchronised tempo codes",
    TALB => "Album/Movie/Show title",
    TBPM => "BPM (beats per minute)",
    TCOM => "Composer",
    TCON => "Content type",
    TCOP => "Copyright message",
    TDAT => "Date",
    TDEN => "Encoding time",
    TDLY => "Playlist delay",
    TDOR => "Original release time",
    TDRC => "Recording time",
    TDRL => "Release time",
    TDTG => "Tagging time",
    TENC => "Encoded by",
    TEXT => "Lyricist/Text writer",
    TFLT => "File type",
    TIME => "Time",
    TIPL => "Involved people list",
    TIT1 => "Content group description",
    TIT2 => "Title/songname/content description",
    TIT3 => "Subtitle/Description refinement",
    TKEY => "Initial key",
    TLAN => "Language(s)",
    TLEN => "Length",
    TMCL => "Musician credits list",
    TMED => "Media type",
    TMOO => "Mood",
    TOAL => "Original album/movie/show title",
    TOFN => "Original filename",
    TOLY => "Original lyricist(s)/text writer(s)",
    TOPE => "Original artist(s)/performer(s)",
    TORY => "Original release year",
    TOWN => "File owner/licensee",
    TPE1 => "Lead performer(s)/Soloist(s)",
    TPE2 => "Band/orchestra/accompaniment",
    TPE3 => "Conductor/performer refinement",
    TPE4 => "Interpreted, remixed, or otherwise modified by",
    TPOS => "Part of a set",
    TPRO => "Produced notice",
    TPUB => "Publisher",
    TRCK => "Track number/Position in set",
    TRDA => "Recording dates",
    TRSN => "Internet radio station name",
    TRSO => "Internet radio station owner",
    TSIZ => "Size",
    TSOA => "Album sort order",
    TSOP => "Performer sort order",
    TSOT => "Title sort order",
    TSRC => "ISRC (international standard recording code)",
    TSSE => "Software/Hardware and settings used for encoding",
    TSST => "Set subtitle",
    TXXX => "User defined text information frame",
    TYER => "Year",
    UFID => "Unique file identifier",
    USER => "Terms of use",
    USLT => "Unsynchronised lyric/text transcription",
    WCOM => "Commercial information",
    WCOP => "Copyright/Legal information",
    WOAF => "Official audio file webpage",
    WOAR => "Official artist/performer webpage",
    WOAS => "Official audio source webpage",
    WORS => "Official Internet radio station homepage",
    WPAY => "Payment",
    WPUB => "Publishers official webpage",
    WXXX => "User defined URL link frame",
}

/// Description of a frame id declared by ID3v2.3 or ID3v2.4.
///
/// Returns `None` for experimental, vendor and legacy three-character ids.
#[must_use]
pub fn frame_name(id: FrameId) -> Option<&'static str> {
    TABLE
        .binary_search_by(|(known, _)| known.cmp(&id))
        .ok()
        .map(|index| TABLE[index].1)
}
