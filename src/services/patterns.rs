//! Static pattern tables for release-name parsing.
//!
//! Every table is ordered and the first pattern that matches wins, so the
//! specific variants are listed before the generic ones (DTS-HD before DTS,
//! WEB-DL before WEB). That iteration order is a contract the extraction
//! tests pin down, not an implementation detail: keep these as ordered lists,
//! never maps.

use once_cell::sync::Lazy;

use crate::services::tokens::TokenPattern;

fn compile(sources: &[&str]) -> Vec<TokenPattern> {
    sources.iter().map(|source| TokenPattern::new(source)).collect()
}

/// Video container extensions.
pub static VIDEO_EXTENSIONS: Lazy<Vec<TokenPattern>> = Lazy::new(|| {
    compile(&[
        "MP4", "MKV", "AVI", "MOV", "FLV", "WMV", "WEBM", "M4V", "TS", "M2TS", "MPG", "MPEG",
        "VOB", "3GP", "OGV", "RMVB", "RM", "DIVX", "F4V",
    ])
});

/// Subtitle file extensions.
pub static SUBTITLE_EXTENSIONS: Lazy<Vec<TokenPattern>> = Lazy::new(|| {
    compile(&[
        "SRT", "ASS", "SSA", "SUB", "VTT", "SBV", "JSON", "SMI", "LRC", "PSB", "IDX", "USF",
        "TTML",
    ])
});

/// Audio file extensions. Recognized so the extension field is still
/// populated, but audio content itself is not handled.
pub static AUDIO_EXTENSIONS: Lazy<Vec<TokenPattern>> = Lazy::new(|| {
    compile(&[
        "MP3", "FLAC", "AAC", "OGG", "WMA", "M4A", "OPUS", "WAV", "APE", "WV", "DTS", "AC3",
        "MKA",
    ])
});

/// Resolution buckets, highest first.
pub static RESOLUTION_PATTERNS: Lazy<Vec<(&'static str, Vec<TokenPattern>)>> = Lazy::new(|| {
    vec![
        ("8K", compile(&["8K", r"4320[PI]?", "7680X4320", "FULLUHD"])),
        ("4K", compile(&["4K", "UHD", r"2160[PI]?", "3840X2160"])),
        ("2K", compile(&["2K", r"1440[PI]?", "2560X1440", "QHD", "WQHD"])),
        ("1080p", compile(&[r"1080[PI]?", "FHD", "1920X1080", "FULLHD"])),
        ("720p", compile(&[r"720[PI]?", "1280X720"])),
        ("576p", compile(&[r"576[PI]?", "PAL"])),
        ("480p", compile(&[r"480[PI]?", "NTSC"])),
        ("360p", compile(&[r"360[PI]?"])),
        ("240p", compile(&[r"240[PI]?"])),
    ]
});

/// Video codecs.
pub static CODEC_PATTERNS: Lazy<Vec<(&'static str, Vec<TokenPattern>)>> = Lazy::new(|| {
    vec![
        ("AV1", compile(&["AV1", r"SVT\.AV1", "SVTAV1", "AOV1"])),
        ("VP9", compile(&["VP9"])),
        ("VP8", compile(&["VP8"])),
        (
            "x265",
            compile(&["X265", r"X\.265", "H265", r"H\.265", "HEVC", "HEVC10", "HEVC10BIT", "H265P"]),
        ),
        (
            "x264",
            compile(&["X264", r"X\.264", "H264", r"H\.264", "AVC", "AVC1", "H264P"]),
        ),
        ("x263", compile(&["X263", r"X\.263", "H263", r"H\.263"])),
        ("XVID", compile(&["XVID", r"XVID\.AF"])),
        ("DIVX", compile(&["DIVX", "DIV3", "DIVX6"])),
        ("MPEG4", compile(&[r"MPEG\.4", "MPEG4", "MP4V"])),
        ("MPEG2", compile(&[r"MPEG\.2", "MPEG2", "MP2V"])),
        ("MPEG1", compile(&[r"MPEG\.1", "MPEG1", "MP1V"])),
        ("VC1", compile(&[r"VC\.1", "VC1", "WMV3", "WVC1"])),
        ("THEORA", compile(&["THEORA"])),
        (
            "PRORES",
            compile(&["PRORES", "PRORES422", "PRORES4444", "PRORES422HQ"]),
        ),
        ("DNxHD", compile(&["DNXHD", "DNXHR"])),
    ]
});

/// Source / rip quality of the release.
pub static SOURCE_PATTERNS: Lazy<Vec<(&'static str, Vec<TokenPattern>)>> = Lazy::new(|| {
    vec![
        ("REMUX", compile(&["REMUX"])),
        (
            "BluRay",
            compile(&[
                "BLURAY", "BDRIP", r"BD\.RIP", r"BR\.RIP", "BRRIP", "BDMV", "BDISO", "BD25",
                "BD50", "BD66", "BD100",
            ]),
        ),
        ("WEB-DL", compile(&[r"WEB\.DL", "WEBDL"])),
        ("WEBRip", compile(&["WEBRIP", r"WEB\.RIP"])),
        ("WEB", compile(&["WEB"])),
        ("HDRip", compile(&["HDRIP", r"HD\.RIP"])),
        ("DVDRip", compile(&["DVDRIP", r"DVD\.RIP"])),
        ("DVD", compile(&["DVD", "DVDSCR", "DVD5", "DVD9"])),
        ("HDTV", compile(&["HDTV", "HDTVRIP", "DTTV", "PDTV", "SDTV", "LDTV"])),
        ("TELECINE", compile(&["TELECINE", "TC"])),
        ("TELESYNC", compile(&["TELESYNC", "TS"])),
        ("SCREENER", compile(&["SCREENER", "SCR", "BDSCR"])),
        ("CAM", compile(&["CAMRIP", "CAM", "HDCAM"])),
        ("WORKPRINT", compile(&["WORKPRINT", "WP"])),
        ("PPV", compile(&["PPV", "PPVRIP"])),
        ("VODRip", compile(&["VODRIP", "VOD"])),
        ("HC", compile(&["HC", "HCHDCAM"])),
        ("LINE", compile(&["LINE"])),
        ("HDTS", compile(&["HDTS", r"HD\.TS"])),
        ("HDTC", compile(&["HDTC", r"HD\.TC"])),
        ("TVRip", compile(&["TVRIP", "SATRIP", "DTTVRIP"])),
    ]
});

/// Audio codec and channel layout.
pub static AUDIO_PATTERNS: Lazy<Vec<(&'static str, Vec<TokenPattern>)>> = Lazy::new(|| {
    vec![
        (
            "Atmos",
            compile(&["ATMOS", r"DOLBY\.ATMOS", "DOLBYATMOS"]),
        ),
        ("DTS-X", compile(&["DTSX", r"DTS\.X"])),
        (
            "DTS-HD",
            compile(&[r"DTS\.HD\.MA", r"DTSHD\.MA", r"DTS\.HD", "DTSHD"]),
        ),
        ("DTS-MA", compile(&[r"DTS\.MA", "DTSMA"])),
        ("DTS-ES", compile(&[r"DTS\.ES", "DTSES"])),
        ("DTS", compile(&["DTS"])),
        ("TrueHD", compile(&["TRUEHD", r"TRUE\.HD"])),
        (
            "DD+",
            compile(&["DDP", r"E\.AC\.3", "EAC3", r"DD\.PLUS", "DDPLUS"]),
        ),
        (
            "DD",
            compile(&["DD", "AC3", r"DOLBY\.DIGITAL", "DOLBYDIGITAL"]),
        ),
        ("AAC", compile(&["AAC", r"HE\.AAC", "HEAAC"])),
        ("FLAC", compile(&["FLAC"])),
        ("MP3", compile(&["MP3"])),
        ("LPCM", compile(&["LPCM", "PCM"])),
        ("OGG", compile(&["OGG", "VORBIS"])),
        ("OPUS", compile(&["OPUS"])),
        ("5.1", compile(&[r"5\.1", "51", "6CH"])),
        ("7.1", compile(&[r"7\.1", "71", "8CH"])),
        ("2.0", compile(&[r"2\.0", "20", "STEREO", "2CH"])),
        ("DUAL", compile(&[r"DUAL\.AUDIO", "DUAL"])),
    ]
});

/// Season indicators. Capture group 1, when present, is the season number.
pub static SEASON_PATTERNS: Lazy<Vec<TokenPattern>> = Lazy::new(|| {
    compile(&[
        r"S(\d+)",
        r"S\.(\d+)",
        r"SEA(\d+)",
        r"SEA\.(\d+)",
        r"SEASON(\d+)",
        r"SEASON\.(\d+)",
        "SEASON",
        r"S(\d+)E\d+",
    ])
});

/// Episode indicators. Capture group 1, when present, is the episode number.
pub static EPISODE_PATTERNS: Lazy<Vec<TokenPattern>> = Lazy::new(|| {
    compile(&[
        r"E(\d+)",
        r"E\.(\d+)",
        r"EP(\d+)",
        r"EP\.(\d+)",
        r"EPISODE(\d+)",
        r"EPISODE\.(\d+)",
        "EPISODE",
        "EP",
        r"S\d+E(\d+)",
        r"\d+X(\d+)",
        r"\d+\.X\.(\d+)",
    ])
});

/// Bonus-content indicators.
pub static EXTRAS_PATTERNS: Lazy<Vec<TokenPattern>> = Lazy::new(|| {
    compile(&[
        "EXTRAS?",
        "FEATURETTES?",
        r"BEHIND\.THE\.SCENES?",
        "BTS",
        r"DELETED\.SCENES?",
        r"MAKING\.OF",
        "TRAILERS?",
        "BONUS",
        "DOCUMENTARY",
        "DOCUMENTARIES",
    ])
});

/// Canonical language label to the synonyms and codes seen in release names.
pub static LANGUAGE_PATTERNS: Lazy<Vec<(&'static str, Vec<TokenPattern>)>> = Lazy::new(|| {
    vec![
        ("ENGLISH", compile(&["ENGLISH", "ENG", "EN"])),
        ("SPANISH", compile(&["SPANISH", "CASTELLANO", "SPA", "ES"])),
        ("FRENCH", compile(&["FRENCH", "FRA", "FR"])),
        ("GERMAN", compile(&["GERMAN", "DEUTSCH", "GER", "DE"])),
        ("ITALIAN", compile(&["ITALIAN", "ITA", "IT", "ITALIANO"])),
        ("PORTUGUESE", compile(&["PORTUGUESE", "PORTUGUES", "POR", "PT"])),
        (
            "BRAZILIAN_PORTUGUESE",
            compile(&["BRAZILIAN", "BRAZIL", "BR", r"PORTUGUESE\.BR", r"PT\.BR"]),
        ),
        ("RUSSIAN", compile(&["RUSSIAN", "RUS", "RU"])),
        ("JAPANESE", compile(&["JAPANESE", "JAP", "JPN", "JP", "JA"])),
        ("KOREAN", compile(&["KOREAN", "KOR", "KO", "KR"])),
        ("ARABIC", compile(&["ARABIC", "ARA", "AR"])),
        ("HEBREW", compile(&["HEBREW", "HEB", "HE"])),
        ("THAI", compile(&["THAI", "THA", "TH"])),
        ("TURKISH", compile(&["TURKISH", "TUR", "TR"])),
        ("GREEK", compile(&["GREEK", "GRE", "EL"])),
        ("POLISH", compile(&["POLISH", "POL", "PL", "POLSKI"])),
        ("HUNGARIAN", compile(&["HUNGARIAN", "HUN", "HU", "MAGYAR"])),
        ("CZECH", compile(&["CZECH", "CZE", "CS"])),
        ("CHINESE", compile(&["CHINESE", "CHI", "ZH"])),
    ]
});
