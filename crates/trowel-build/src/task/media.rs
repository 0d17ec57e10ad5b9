//! Image and media tasks: binary assets, copied by extension filter.

use std::fs;

use rayon::prelude::*;

use crate::config::BuildContext;
use crate::task::{files_under, has_extension, TaskError};

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp", "ico"];
pub const MEDIA_EXTENSIONS: &[&str] = &["mp3", "wav", "mp4", "flv", "ogg", "webm"];

pub fn run_image(ctx: &BuildContext) -> Result<usize, TaskError> {
    copy_by_extension(ctx, IMAGE_EXTENSIONS)
}

pub fn run_media(ctx: &BuildContext) -> Result<usize, TaskError> {
    copy_by_extension(ctx, MEDIA_EXTENSIONS)
}

fn copy_by_extension(ctx: &BuildContext, extensions: &[&str]) -> Result<usize, TaskError> {
    let src = ctx.src_dir();
    let out = ctx.out_dir();
    let files = files_under(src, |p| has_extension(p, extensions));

    let results: Vec<Result<(), TaskError>> = files
        .par_iter()
        .map(|path| {
            let rel = path.strip_prefix(src).unwrap_or(path);
            let dest = out.join(rel);

            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).map_err(|e| TaskError::Write {
                    path: dest.clone(),
                    source: e,
                })?;
            }

            fs::copy(path, &dest)
                .map(|_| ())
                .map_err(|e| TaskError::Write {
                    path: dest.clone(),
                    source: e,
                })
        })
        .collect();

    for result in results {
        result?;
    }

    Ok(files.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Profile};
    use tempfile::tempdir;

    fn ctx(root: &std::path::Path) -> BuildContext {
        let mut config = Config::default();
        config.paths.src = root.join("src");
        config.paths.out = root.join("dist");
        BuildContext::new(config, Profile::Development)
    }

    #[test]
    fn copies_only_matching_extensions() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(src.join("img")).unwrap();
        fs::write(src.join("img/logo.png"), [0x89, b'P', b'N', b'G']).unwrap();
        fs::write(src.join("img/photo.JPG"), [0xFF, 0xD8]).unwrap();
        fs::write(src.join("index.html"), "<p>not an image</p>").unwrap();

        let copied = run_image(&ctx(temp.path())).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(
            fs::read(temp.path().join("dist/img/logo.png")).unwrap(),
            vec![0x89, b'P', b'N', b'G']
        );
        assert!(!temp.path().join("dist/index.html").exists());
    }

    #[test]
    fn media_filter_is_disjoint_from_images() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("intro.mp4"), [1u8, 2, 3]).unwrap();
        fs::write(src.join("logo.png"), [4u8, 5]).unwrap();

        let copied = run_media(&ctx(temp.path())).unwrap();

        assert_eq!(copied, 1);
        assert!(temp.path().join("dist/intro.mp4").exists());
        assert!(!temp.path().join("dist/logo.png").exists());
    }
}
