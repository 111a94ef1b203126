//! Compiles a profile into an engine argument list.
//!
//! The command is assembled from independent sections, each built into its
//! own list. Conflict rules (rate pinning, scale suppression) are resolved
//! while the sections are built; concatenation happens last and nothing is
//! patched afterwards. Section order matters: the engine reads options
//! positionally and the last occurrence of an option wins.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::path::{Path, PathBuf};

use crate::profile::{keys, Profile};

use super::error::CommandError;
use super::tokenize::split_words;

/// Extension used when the profile names neither a wrapper nor an audio
/// extension.
pub const DEFAULT_EXTENSION: &str = "mkv";

/// File stem used for preview output.
pub const PREVIEW_STEM: &str = "output";

/// Scaling filters whose presence in the video chain suppresses `-s`.
static SCALE_FILTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:^|[,;\]\s])(?:scale|zscale|scale_cuda|scale_npp|scale_qsv|scale_vaapi|scale_vt|scale_vulkan)=",
    )
    .expect("scale filter pattern is valid")
});

/// One ordered slice of the final command.
#[derive(Debug, Default)]
struct Section {
    args: Vec<String>,
}

impl Section {
    fn new() -> Self {
        Self::default()
    }

    fn from_args(args: Vec<String>) -> Self {
        Self { args }
    }

    /// Appends `flag value` when `value` is non-blank.
    fn flag(&mut self, flag: &str, value: &str) -> &mut Self {
        let value = value.trim();
        if !value.is_empty() {
            self.args.push(flag.to_string());
            self.args.push(value.to_string());
        }
        self
    }

    fn arg(&mut self, arg: impl Into<String>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    /// Drops every `-minrate`/`-maxrate` option and the value after it.
    fn without_rate_limits(self) -> Self {
        let mut kept = Vec::with_capacity(self.args.len());
        let mut iter = self.args.into_iter();
        while let Some(arg) = iter.next() {
            if is_rate_limit_flag(&arg) {
                iter.next();
                continue;
            }
            kept.push(arg);
        }
        Self { args: kept }
    }
}

fn is_rate_limit_flag(arg: &str) -> bool {
    ["-minrate", "-maxrate"]
        .iter()
        .any(|flag| arg == *flag || arg.starts_with(&format!("{flag}:")))
}

fn concat(sections: Vec<Section>) -> Vec<String> {
    sections.into_iter().flat_map(|s| s.args).collect()
}

/// Whether a filter chain already scales the picture.
pub fn has_scale_filter(chain: &str) -> bool {
    SCALE_FILTER.is_match(chain)
}

/// Output extension: wrapper, else audio extension, else [`DEFAULT_EXTENSION`].
pub fn output_extension(profile: &Profile) -> String {
    [keys::VIDEO_WRAPPER, keys::AUDIO_FILE_EXTENSION]
        .iter()
        .map(|key| profile.get(key).trim().trim_start_matches('.'))
        .find(|ext| !ext.is_empty())
        .unwrap_or(DEFAULT_EXTENSION)
        .to_string()
}

/// Output path for `input`: `output.<ext>` in preview mode, otherwise
/// `<stem>.<ext>`, placed in `OUTPUTDIRECTORY` when the profile sets one.
pub fn output_path(profile: &Profile, input: &Path, preview: bool) -> PathBuf {
    let ext = output_extension(profile);
    if preview {
        return PathBuf::from(format!("{PREVIEW_STEM}.{ext}"));
    }

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| PREVIEW_STEM.to_string());
    let file_name = format!("{stem}.{ext}");

    match profile.output_dir() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

fn preamble() -> Section {
    let mut s = Section::new();
    s.arg("-hide_banner").arg("-y");
    s
}

fn manual_input(profile: &Profile) -> Vec<String> {
    split_words(profile.get(keys::MANUAL_OPTIONS_INPUT))
}

/// Whether the video rate section pins min/max rate to the bitrate.
fn pins_rate_limits(profile: &Profile) -> bool {
    profile.flag(keys::MATCH_MIN_MAX_BITRATE) && !profile.get(keys::VIDEO_BITRATE).trim().is_empty()
}

fn video_rate(profile: &Profile) -> Section {
    let mut s = Section::new();
    let bitrate = profile.get(keys::VIDEO_BITRATE);
    s.flag("-c:v", profile.get(keys::VIDEO_CODECS))
        .flag("-b:v", bitrate);
    if pins_rate_limits(profile) {
        s.flag("-minrate", bitrate).flag("-maxrate", bitrate);
    }
    s
}

fn video_tuning(profile: &Profile) -> Section {
    let mut s = Section::new();
    s.flag("-profile:v", profile.get(keys::VIDEO_PROFILE))
        .flag("-level:v", profile.get(keys::VIDEO_PROFILE_LEVEL))
        .flag("-g", profile.get(keys::GROUP_PIC_SIZE))
        .flag("-bf", profile.get(keys::B_FRAMES))
        .flag("-b_strategy", profile.get(keys::FRAME_STRATEGY));
    s
}

fn video_picture(profile: &Profile) -> Section {
    let mut s = Section::new();
    let filters = profile.get(keys::VIDEO_FILTERS);
    s.flag("-vf", filters);
    if !has_scale_filter(filters) {
        s.flag("-s", profile.get(keys::VIDEO_SIZE));
    }
    s.flag("-pix_fmt", profile.get(keys::VIDEO_PIX_FORMAT));
    s
}

fn subtitles(profile: &Profile) -> Section {
    let mut s = Section::new();
    s.flag("-c:s", profile.get(keys::SUBTITLE_CODECS));
    s
}

fn audio(profile: &Profile) -> Section {
    let mut s = Section::new();
    s.flag("-c:a", profile.get(keys::AUDIO_CODECS))
        .flag("-b:a", profile.get(keys::AUDIO_BITRATE))
        .flag("-ar", profile.get(keys::AUDIO_SAMPLE_RATE))
        .flag("-ac", profile.get(keys::AUDIO_CHANNELS))
        .flag("-af", profile.get(keys::AUDIO_FILTERS));
    s
}

fn has_explicit_mapping(profile: &Profile) -> bool {
    !profile.get(keys::VIDEO_STREAM_ID).trim().is_empty()
        || !profile.get(keys::AUDIO_STREAM_ID).trim().is_empty()
}

fn explicit_mapping(profile: &Profile) -> Section {
    let mut s = Section::new();
    s.flag("-map", profile.get(keys::VIDEO_STREAM_ID))
        .flag("-map", profile.get(keys::AUDIO_STREAM_ID));
    s
}

fn timing(profile: &Profile) -> Section {
    let mut s = Section::new();
    s.flag("-t", profile.get(keys::ENCODE_LENGTH))
        .flag("-ss", profile.get(keys::START_TIME_OFFSET));
    s
}

fn manual_output(profile: &Profile) -> Section {
    Section::from_args(split_words(profile.get(keys::MANUAL_OPTIONS_OUTPUT)))
}

fn forced_format(profile: &Profile) -> Section {
    let mut s = Section::new();
    s.flag("-f", profile.get(keys::FORCE_FORMAT));
    s
}

/// Builds the engine arguments for converting `input` with `profile`.
///
/// Total and deterministic: missing keys simply drop their flags.
pub fn synthesize(profile: &Profile, input: &Path, preview: bool) -> Vec<String> {
    let mut pre_input = Section::from_args(manual_input(profile));
    if pins_rate_limits(profile) {
        pre_input = pre_input.without_rate_limits();
    }

    let mut input_section = Section::new();
    input_section.arg("-i").arg(input.to_string_lossy());

    let mut output = Section::new();
    output.arg(output_path(profile, input, preview).to_string_lossy());

    concat(vec![
        preamble(),
        pre_input,
        input_section,
        video_rate(profile),
        video_tuning(profile),
        video_picture(profile),
        subtitles(profile),
        audio(profile),
        explicit_mapping(profile),
        timing(profile),
        manual_output(profile),
        forced_format(profile),
        output,
    ])
}

/// Builds the engine arguments for a live/stream destination.
///
/// When the manual input options contain their own `-i`, they are taken as
/// a complete input graph and pasted unchanged. Otherwise they are options
/// for the video input, and the video (plus optional audio) inputs are
/// appended with the configured format and thread-queue hints.
pub fn synthesize_streaming(
    profile: &Profile,
    video_input: &str,
    audio_input: Option<&str>,
    destination: Option<&str>,
) -> Result<Vec<String>, CommandError> {
    let destination = destination
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or(CommandError::MissingDestination)?;

    let manual = manual_input(profile);
    let (inputs, input_count) = if manual.iter().any(|arg| arg == "-i") {
        let count = manual.iter().filter(|arg| *arg == "-i").count();
        (Section::from_args(manual), count)
    } else {
        let mut pre_input = Section::from_args(manual);
        if pins_rate_limits(profile) {
            pre_input = pre_input.without_rate_limits();
        }

        let queue_size = profile.get(keys::THREAD_QUEUE_SIZE);
        let mut inputs = pre_input;
        inputs
            .flag("-thread_queue_size", queue_size)
            .flag("-f", profile.get(keys::STREAM_VIDEO_FORMAT))
            .arg("-i")
            .arg(video_input);

        let mut count = 1;
        if let Some(audio_input) = audio_input.map(str::trim).filter(|a| !a.is_empty()) {
            inputs
                .flag("-thread_queue_size", queue_size)
                .flag("-f", profile.get(keys::STREAM_AUDIO_FORMAT))
                .arg("-i")
                .arg(audio_input);
            count += 1;
        }
        (inputs, count)
    };

    let mapping = if has_explicit_mapping(profile) {
        explicit_mapping(profile)
    } else if profile.flag(keys::AUTO_MAP_STREAMS) {
        default_mapping(input_count)
    } else {
        Section::new()
    };

    let mut destination_section = Section::new();
    destination_section.arg(destination);

    Ok(concat(vec![
        preamble(),
        inputs,
        video_rate(profile),
        video_tuning(profile),
        video_picture(profile),
        subtitles(profile),
        audio(profile),
        mapping,
        manual_output(profile),
        forced_format(profile),
        destination_section,
    ]))
}

fn default_mapping(input_count: usize) -> Section {
    let mut s = Section::new();
    match input_count {
        0 => {}
        1 => {
            s.flag("-map", "0:v");
        }
        _ => {
            s.flag("-map", "0:v").flag("-map", "1:a");
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(pairs: &[(&str, &str)]) -> Profile {
        Profile::from_pairs("test", pairs.iter().copied())
    }

    fn count(args: &[String], flag: &str) -> usize {
        args.iter().filter(|a| *a == flag).count()
    }

    fn value_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .map(String::as_str)
    }

    fn contains_sequence(args: &[String], seq: &[&str]) -> bool {
        args.windows(seq.len())
            .any(|w| w.iter().zip(seq).all(|(a, b)| a == b))
    }

    #[test]
    fn test_empty_profile() {
        let args = synthesize(&Profile::default(), Path::new("/in/clip.mov"), false);
        assert_eq!(args, vec!["-hide_banner", "-y", "-i", "/in/clip.mov", "clip.mkv"]);
    }

    #[test]
    fn test_basic_h264_scenario() {
        let p = profile(&[
            ("VIDEOCODECS", "libx264"),
            ("VIDEOBITRATE", "2M"),
            ("AUDIOCODECS", "aac"),
            ("AUDIOBITRATE", "128k"),
            ("VIDEOWRAPPER", "mp4"),
        ]);
        let args = synthesize(&p, Path::new("clip.mov"), false);

        assert!(contains_sequence(&args, &["-c:v", "libx264", "-b:v", "2M"]));
        assert!(contains_sequence(&args, &["-c:a", "aac", "-b:a", "128k"]));
        assert_eq!(args.last().map(String::as_str), Some("clip.mp4"));

        let video_pos = args.iter().position(|a| a == "-c:v").unwrap();
        let audio_pos = args.iter().position(|a| a == "-c:a").unwrap();
        assert!(video_pos < audio_pos);
    }

    #[test]
    fn test_deterministic() {
        let p = profile(&[
            ("VIDEOCODECS", "libx265"),
            ("VIDEOFILTERS", "yadif"),
            ("MANUALOPTIONSINPUT", "-hwaccel auto"),
            ("MANUALOPTIONSOUTPUT", "-movflags +faststart"),
        ]);
        let first = synthesize(&p, Path::new("/a/b.mkv"), false);
        let second = synthesize(&p, Path::new("/a/b.mkv"), false);
        assert_eq!(first, second);
    }

    #[test]
    fn test_full_order() {
        let p = profile(&[
            ("MANUALOPTIONSINPUT", "-hwaccel cuda"),
            ("VIDEOCODECS", "h264_nvenc"),
            ("VIDEOBITRATE", "4M"),
            ("VIDEOPROFILE", "high"),
            ("VIDEOPROFILELEVEL", "4.1"),
            ("GROUPPICSIZE", "250"),
            ("BFRAMES", "2"),
            ("FRAMESTRATEGY", "1"),
            ("VIDEOFILTERS", "yadif"),
            ("VIDEOSIZE", "1280x720"),
            ("VIDEOPIXFORMAT", "yuv420p"),
            ("SUBTITLECODECS", "mov_text"),
            ("AUDIOCODECS", "aac"),
            ("AUDIOBITRATE", "160k"),
            ("AUDIOSAMPLERATE", "48000"),
            ("AUDIOCHANNELS", "2"),
            ("AUDIOFILTERS", "loudnorm"),
            ("VIDEOSTREAMID", "0:v:0"),
            ("AUDIOSTREAMID", "0:a:1"),
            ("ENCODELENGTH", "60"),
            ("STARTTIMEOFFSET", "5"),
            ("MANUALOPTIONSOUTPUT", "-movflags +faststart"),
            ("FORCEFORMAT", "mp4"),
            ("VIDEOWRAPPER", "m4v"),
        ]);
        let args = synthesize(&p, Path::new("/in/show.ts"), false);

        let expected: Vec<&str> = vec![
            "-hide_banner", "-y",
            "-hwaccel", "cuda",
            "-i", "/in/show.ts",
            "-c:v", "h264_nvenc", "-b:v", "4M",
            "-profile:v", "high", "-level:v", "4.1", "-g", "250", "-bf", "2", "-b_strategy", "1",
            "-vf", "yadif", "-s", "1280x720", "-pix_fmt", "yuv420p",
            "-c:s", "mov_text",
            "-c:a", "aac", "-b:a", "160k", "-ar", "48000", "-ac", "2", "-af", "loudnorm",
            "-map", "0:v:0", "-map", "0:a:1",
            "-t", "60", "-ss", "5",
            "-movflags", "+faststart",
            "-f", "mp4",
            "show.m4v",
        ];
        assert_eq!(args, expected);
    }

    #[test]
    fn test_scale_filter_suppresses_size() {
        for chain in [
            "scale=1280:-2",
            "yadif,scale=1920:1080",
            "[0:v]scale_cuda=1280:720",
            "zscale=t=linear",
            "hwupload, scale_vaapi=w=1280:h=720",
        ] {
            let p = profile(&[("VIDEOFILTERS", chain), ("VIDEOSIZE", "640x360")]);
            let args = synthesize(&p, Path::new("a.mov"), false);
            assert_eq!(count(&args, "-s"), 0, "chain {chain:?} should suppress -s");
            assert_eq!(value_after(&args, "-vf"), Some(chain));
        }
    }

    #[test]
    fn test_has_scale_filter_names() {
        for name in [
            "scale", "zscale", "scale_cuda", "scale_npp", "scale_qsv", "scale_vaapi", "scale_vt",
            "scale_vulkan",
        ] {
            assert!(has_scale_filter(&format!("{name}=1280:720")), "{name}");
        }
        assert!(!has_scale_filter("rescale=2"));
        assert!(!has_scale_filter("scale2ref"));
        assert!(!has_scale_filter(""));
    }

    #[test]
    fn test_non_scale_filter_keeps_size() {
        let p = profile(&[("VIDEOFILTERS", "yadif,fps=30"), ("VIDEOSIZE", "640x360")]);
        let args = synthesize(&p, Path::new("a.mov"), false);
        assert_eq!(value_after(&args, "-s"), Some("640x360"));
    }

    #[test]
    fn test_size_without_filters() {
        let p = profile(&[("VIDEOSIZE", "640x360")]);
        let args = synthesize(&p, Path::new("a.mov"), false);
        assert_eq!(value_after(&args, "-s"), Some("640x360"));
        assert_eq!(count(&args, "-vf"), 0);
    }

    #[test]
    fn test_match_min_max_bitrate_dedupes() {
        let p = profile(&[
            ("VIDEOBITRATE", "5M"),
            ("MATCHMINMAXBITRATE", "true"),
            ("MANUALOPTIONSINPUT", "-minrate 1M -hwaccel auto -maxrate:v 9M"),
        ]);
        let args = synthesize(&p, Path::new("a.mov"), false);

        assert_eq!(count(&args, "-minrate"), 1);
        assert_eq!(count(&args, "-maxrate"), 1);
        assert!(!args.iter().any(|a| a.starts_with("-maxrate:")));
        assert!(contains_sequence(
            &args,
            &["-b:v", "5M", "-minrate", "5M", "-maxrate", "5M"]
        ));
        // Unrelated manual options survive
        assert!(contains_sequence(&args, &["-hwaccel", "auto"]));
    }

    #[test]
    fn test_match_min_max_without_bitrate_is_noop() {
        let p = profile(&[
            ("MATCHMINMAXBITRATE", "yes"),
            ("MANUALOPTIONSINPUT", "-minrate 1M"),
        ]);
        let args = synthesize(&p, Path::new("a.mov"), false);
        assert!(contains_sequence(&args, &["-minrate", "1M"]));
        assert_eq!(count(&args, "-maxrate"), 0);
    }

    #[test]
    fn test_match_min_max_falsey_leaves_manual_rates() {
        let p = profile(&[
            ("VIDEOBITRATE", "5M"),
            ("MATCHMINMAXBITRATE", "no"),
            ("MANUALOPTIONSINPUT", "-maxrate 8M"),
        ]);
        let args = synthesize(&p, Path::new("a.mov"), false);
        assert_eq!(value_after(&args, "-maxrate"), Some("8M"));
        assert_eq!(count(&args, "-minrate"), 0);
    }

    #[test]
    fn test_manual_input_precedes_input() {
        let p = profile(&[("MANUALOPTIONSINPUT", r#"-ss 10 -metadata title="A B""#)]);
        let args = synthesize(&p, Path::new("a.mov"), false);
        let ss = args.iter().position(|a| a == "-ss").unwrap();
        let input = args.iter().position(|a| a == "-i").unwrap();
        assert!(ss < input);
        assert!(args.contains(&"title=A B".to_string()));
    }

    #[test]
    fn test_manual_output_follows_structured_flags() {
        let p = profile(&[
            ("VIDEOCODECS", "libx264"),
            ("MANUALOPTIONSOUTPUT", "-c:v libx265"),
            ("FORCEFORMAT", "matroska"),
        ]);
        let args = synthesize(&p, Path::new("a.mov"), false);
        let structured = args.iter().position(|a| a == "libx264").unwrap();
        let manual = args.iter().position(|a| a == "libx265").unwrap();
        let format = args.iter().position(|a| a == "-f").unwrap();
        assert!(structured < manual);
        assert!(manual < format);
    }

    #[test]
    fn test_preview_output_name() {
        let p = profile(&[("VIDEOWRAPPER", "webm"), ("OUTPUTDIRECTORY", "/srv/out")]);
        for input in ["/in/first.mov", "/elsewhere/second clip.avi"] {
            let args = synthesize(&p, Path::new(input), true);
            assert_eq!(args.last().map(String::as_str), Some("output.webm"));
        }
    }

    #[test]
    fn test_output_uses_input_stem() {
        let p = profile(&[("VIDEOWRAPPER", ".mp4")]);
        assert_eq!(
            output_path(&p, Path::new("/in/holiday.2024.mov"), false),
            PathBuf::from("holiday.2024.mp4")
        );
    }

    #[test]
    fn test_output_directory() {
        let p = profile(&[("VIDEOWRAPPER", "mp4"), ("OUTPUTDIRECTORY", "/srv/out")]);
        assert_eq!(
            output_path(&p, Path::new("/in/clip.mov"), false),
            PathBuf::from("/srv/out/clip.mp4")
        );
    }

    #[test]
    fn test_extension_fallbacks() {
        assert_eq!(output_extension(&profile(&[("VIDEOWRAPPER", "mov")])), "mov");
        assert_eq!(
            output_extension(&profile(&[("AUDIOFILEEXTENSION", "flac")])),
            "flac"
        );
        assert_eq!(
            output_extension(&profile(&[("VIDEOWRAPPER", " "), ("AUDIOFILEEXTENSION", "m4a")])),
            "m4a"
        );
        assert_eq!(output_extension(&Profile::default()), DEFAULT_EXTENSION);
    }

    #[test]
    fn test_streaming_requires_destination() {
        let p = profile(&[]);
        assert!(matches!(
            synthesize_streaming(&p, "/dev/video0", None, None),
            Err(CommandError::MissingDestination)
        ));
        assert!(matches!(
            synthesize_streaming(&p, "/dev/video0", None, Some("  ")),
            Err(CommandError::MissingDestination)
        ));
    }

    #[test]
    fn test_streaming_two_inputs_automap() {
        let p = profile(&[
            ("MANUALOPTIONSINPUT", "-framerate 30"),
            ("STREAMVIDEOFORMAT", "v4l2"),
            ("STREAMAUDIOFORMAT", "alsa"),
            ("THREADQUEUESIZE", "512"),
            ("AUTOMAPSTREAMS", "on"),
            ("VIDEOCODECS", "libx264"),
            ("AUDIOCODECS", "aac"),
            ("FORCEFORMAT", "flv"),
        ]);
        let args = synthesize_streaming(
            &p,
            "/dev/video0",
            Some("hw:1"),
            Some("rtmp://live.example/app/key"),
        )
        .unwrap();

        let expected: Vec<&str> = vec![
            "-hide_banner", "-y",
            "-framerate", "30",
            "-thread_queue_size", "512", "-f", "v4l2", "-i", "/dev/video0",
            "-thread_queue_size", "512", "-f", "alsa", "-i", "hw:1",
            "-c:v", "libx264",
            "-c:a", "aac",
            "-map", "0:v", "-map", "1:a",
            "-f", "flv",
            "rtmp://live.example/app/key",
        ];
        assert_eq!(args, expected);
    }

    #[test]
    fn test_streaming_single_input_automap() {
        let p = profile(&[("AUTOMAPSTREAMS", "1")]);
        let args = synthesize_streaming(&p, "desktop", Some(""), Some("udp://239.0.0.1:1234"))
            .unwrap();
        assert!(contains_sequence(&args, &["-map", "0:v"]));
        assert_eq!(count(&args, "-map"), 1);
        assert_eq!(count(&args, "-i"), 1);
    }

    #[test]
    fn test_streaming_explicit_mapping_wins() {
        let p = profile(&[("AUTOMAPSTREAMS", "true"), ("VIDEOSTREAMID", "1:v:0")]);
        let args = synthesize_streaming(&p, "a", Some("b"), Some("out.ts")).unwrap();
        assert_eq!(count(&args, "-map"), 1);
        assert_eq!(value_after(&args, "-map"), Some("1:v:0"));
    }

    #[test]
    fn test_streaming_no_automap_without_flag() {
        let p = profile(&[]);
        let args = synthesize_streaming(&p, "a", Some("b"), Some("out.ts")).unwrap();
        assert_eq!(count(&args, "-map"), 0);
    }

    #[test]
    fn test_streaming_manual_input_graph_is_verbatim() {
        let p = profile(&[
            (
                "MANUALOPTIONSINPUT",
                "-f lavfi -i testsrc=size=1280x720 -f lavfi -i sine",
            ),
            ("THREADQUEUESIZE", "1024"),
            ("AUTOMAPSTREAMS", "true"),
        ]);
        let args = synthesize_streaming(&p, "/dev/video0", Some("hw:0"), Some("out.flv")).unwrap();

        assert!(!args.contains(&"/dev/video0".to_string()));
        assert!(!args.contains(&"hw:0".to_string()));
        assert_eq!(count(&args, "-thread_queue_size"), 0);
        assert!(contains_sequence(
            &args,
            &["-f", "lavfi", "-i", "testsrc=size=1280x720", "-f", "lavfi", "-i", "sine"]
        ));
        // Two inputs in the pasted graph drive the default mapping
        assert!(contains_sequence(&args, &["-map", "0:v", "-map", "1:a"]));
    }
}
