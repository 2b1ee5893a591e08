//! Transform URL builder.
//!
//! The server applies an ordered pipeline of image/video operations to a file
//! before returning it. The pipeline is encoded in the `t` query parameter:
//!
//! ```text
//! {prefix}/{path}?t=op=snapshot,w=200,h=200|op=thumbnail,w=200,h=200&mtime=1700000000
//! ```
//!
//! Stages are separated by `|`, key/value pairs inside a stage by `,`. The
//! `mtime` parameter is only present when the target is a listing entry and
//! busts the browser/HTTP cache when the file is overwritten.
//!
//! Building is deterministic: equal inputs always yield byte-identical URLs.
//! No validation is done against what the server supports.

use std::fmt;

use super::entry::{EnrichedFileEntry, FileEntry};
use super::ApiBase;

/// Query parameter carrying the pipeline.
pub const QUERY_KEY: &str = "t";
/// Separator between pipeline stages.
pub const STAGE_SEP: &str = "|";
/// Separator between key/value pairs within a stage.
pub const PARAM_SEP: &str = ",";

/// Named transform operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    /// Scale and crop to exactly `w`x`h`.
    Thumbnail,
    /// Scale to fit within `w`x`h`, keeping the aspect ratio.
    Resize,
    /// Grab frame `framenum` of a video as an image.
    Snapshot,
}

impl TransformKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransformKind::Thumbnail => "thumbnail",
            TransformKind::Resize => "resize",
            TransformKind::Snapshot => "snapshot",
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional parameters of one stage; unset values are not serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformParams {
    pub w: Option<u32>,
    pub h: Option<u32>,
    pub format: Option<String>,
    pub framenum: Option<u32>,
}

/// One stage of a transform pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOp {
    pub kind: TransformKind,
    pub params: TransformParams,
}

impl TransformOp {
    pub fn new(kind: TransformKind) -> Self {
        Self {
            kind,
            params: TransformParams::default(),
        }
    }

    fn sized(kind: TransformKind, w: u32, h: u32) -> Self {
        let mut op = Self::new(kind);
        op.params.w = Some(w);
        op.params.h = Some(h);
        op
    }

    pub fn thumbnail(w: u32, h: u32) -> Self {
        Self::sized(TransformKind::Thumbnail, w, h)
    }

    pub fn resize(w: u32, h: u32) -> Self {
        Self::sized(TransformKind::Resize, w, h)
    }

    pub fn snapshot(w: u32, h: u32) -> Self {
        Self::sized(TransformKind::Snapshot, w, h)
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.params.format = Some(format.into());
        self
    }

    pub fn with_framenum(mut self, framenum: u32) -> Self {
        self.params.framenum = Some(framenum);
        self
    }

    /// Serialize as `op=<kind>[,w=..][,h=..][,format=..][,framenum=..]`.
    pub fn token(&self) -> String {
        let mut parts = vec![format!("op={}", self.kind)];
        if let Some(w) = self.params.w {
            parts.push(format!("w={}", w));
        }
        if let Some(h) = self.params.h {
            parts.push(format!("h={}", h));
        }
        if let Some(format) = &self.params.format {
            parts.push(format!("format={}", format));
        }
        if let Some(framenum) = self.params.framenum {
            parts.push(format!("framenum={}", framenum));
        }
        parts.join(PARAM_SEP)
    }
}

/// Ordered sequence of stages. A single op converts into a one-stage pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline(pub Vec<TransformOp>);

impl Pipeline {
    /// `op=..|op=..` in input order.
    pub fn token(&self) -> String {
        self.0
            .iter()
            .map(TransformOp::token)
            .collect::<Vec<_>>()
            .join(STAGE_SEP)
    }

    /// Poster for a video: grab a frame (the server's default when `frame`
    /// is `None`), then thumbnail it.
    pub fn video_poster(w: u32, h: u32, frame: Option<u32>) -> Self {
        let mut snapshot = TransformOp::snapshot(w, h);
        if let Some(frame) = frame {
            snapshot = snapshot.with_framenum(frame);
        }
        Pipeline(vec![snapshot, TransformOp::thumbnail(w, h)])
    }
}

impl From<TransformOp> for Pipeline {
    fn from(op: TransformOp) -> Self {
        Pipeline(vec![op])
    }
}

impl From<Vec<TransformOp>> for Pipeline {
    fn from(ops: Vec<TransformOp>) -> Self {
        Pipeline(ops)
    }
}

impl From<&[TransformOp]> for Pipeline {
    fn from(ops: &[TransformOp]) -> Self {
        Pipeline(ops.to_vec())
    }
}

/// What to transform: a listing entry (with a known mtime) or a bare path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRef<'a> {
    Entry { path: &'a str, mtime: i64 },
    Path(&'a str),
}

impl<'a> FileRef<'a> {
    pub fn path(&self) -> &'a str {
        match self {
            FileRef::Entry { path, .. } => path,
            FileRef::Path(path) => path,
        }
    }

    pub fn mtime(&self) -> Option<i64> {
        match self {
            FileRef::Entry { mtime, .. } => Some(*mtime),
            FileRef::Path(_) => None,
        }
    }
}

impl<'a> From<&'a FileEntry> for FileRef<'a> {
    fn from(entry: &'a FileEntry) -> Self {
        FileRef::Entry {
            path: &entry.path,
            mtime: entry.mtime,
        }
    }
}

impl<'a> From<&'a EnrichedFileEntry> for FileRef<'a> {
    fn from(entry: &'a EnrichedFileEntry) -> Self {
        FileRef::from(&entry.entry)
    }
}

impl<'a> From<&'a str> for FileRef<'a> {
    fn from(path: &'a str) -> Self {
        FileRef::Path(path)
    }
}

/// Build the request URL for `ops` applied to `target`.
pub fn build_transform_url<'a>(
    base: &ApiBase,
    target: impl Into<FileRef<'a>>,
    ops: impl Into<Pipeline>,
) -> String {
    let target = target.into();
    let pipeline = ops.into();

    let mut query = format!("{}={}", QUERY_KEY, pipeline.token());
    if let Some(mtime) = target.mtime() {
        query.push_str(&format!("&mtime={}", mtime));
    }

    format!("{}?{}", base.url_for(target.path()), query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ApiBase {
        ApiBase::new("http://h", "-")
    }

    fn photo() -> FileEntry {
        FileEntry {
            name: "cat".into(),
            file_name: "cat.png".into(),
            file_ext: ".png".into(),
            path: "pics/cat.png".into(),
            mime_type: "image/png".into(),
            mtime: 1700,
            ..Default::default()
        }
    }

    #[test]
    fn single_op_on_entry() {
        let f = photo();
        let url = build_transform_url(&base(), &f, TransformOp::thumbnail(100, 100));
        assert_eq!(
            url,
            "http://h/-/pics/cat.png?t=op=thumbnail,w=100,h=100&mtime=1700"
        );
    }

    #[test]
    fn deterministic_for_identical_inputs() {
        let f = photo();
        let a = build_transform_url(&base(), &f, TransformOp::thumbnail(100, 100));
        let b = build_transform_url(&base(), &f, TransformOp::thumbnail(100, 100));
        assert_eq!(a, b);
    }

    #[test]
    fn pipeline_keeps_input_order() {
        let f = photo();
        let url = build_transform_url(
            &base(),
            &f,
            vec![TransformOp::snapshot(200, 200), TransformOp::thumbnail(200, 200)],
        );
        let t = url
            .split_once("?t=")
            .and_then(|(_, rest)| rest.split('&').next())
            .unwrap();
        assert_eq!(t, "op=snapshot,w=200,h=200|op=thumbnail,w=200,h=200");
        assert!(t.find("op=snapshot").unwrap() < t.find("op=thumbnail").unwrap());
    }

    #[test]
    fn bare_path_omits_mtime() {
        let url = build_transform_url(&base(), "avatar.jpg", TransformOp::thumbnail(140, 140));
        assert_eq!(url, "http://h/-/avatar.jpg?t=op=thumbnail,w=140,h=140");
    }

    #[test]
    fn unset_params_are_omitted() {
        let op = TransformOp::new(TransformKind::Resize);
        assert_eq!(op.token(), "op=resize");
        let op = TransformOp {
            kind: TransformKind::Resize,
            params: TransformParams {
                h: Some(50),
                ..Default::default()
            },
        };
        assert_eq!(op.token(), "op=resize,h=50");
    }

    #[test]
    fn params_serialize_in_fixed_order() {
        let op = TransformOp::snapshot(10, 20)
            .with_framenum(3)
            .with_format("jpeg");
        assert_eq!(op.token(), "op=snapshot,w=10,h=20,format=jpeg,framenum=3");
    }

    #[test]
    fn video_poster_pipeline() {
        let url = build_transform_url(&base(), "v.mp4", Pipeline::video_poster(64, 48, None));
        assert_eq!(
            url,
            "http://h/-/v.mp4?t=op=snapshot,w=64,h=48|op=thumbnail,w=64,h=48"
        );
    }

    #[test]
    fn video_poster_at_frame() {
        let url = build_transform_url(&base(), "v.mp4", Pipeline::video_poster(64, 48, Some(25)));
        assert_eq!(
            url,
            "http://h/-/v.mp4?t=op=snapshot,w=64,h=48,framenum=25|op=thumbnail,w=64,h=48"
        );
    }

    #[test]
    fn enriched_entry_carries_mtime() {
        let enriched = crate::api::normalize::normalize(photo(), &base());
        let url = build_transform_url(&base(), &enriched, TransformOp::resize(800, 600));
        assert!(url.ends_with("&mtime=1700"));
    }
}
