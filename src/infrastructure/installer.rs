use crate::error::{AppError, AppResult};
use flate2::read::GzDecoder;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::Cursor;
use std::path::{Component, Path, PathBuf};
use tar::Archive;

/// 下载进度条；静默模式下返回隐藏实例
pub fn create_progress_bar(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta}) {percent}%")
            .unwrap()
            .progress_chars("#>-")
    );
    pb
}

/// 将 tar.gz 字节流解压到目标目录，剥掉首层路径（归档里的 `go/`）
pub fn unpack_tar_gz(bytes: &[u8], dest: &Path) -> AppResult<()> {
    let decoder = GzDecoder::new(Cursor::new(bytes));
    let mut archive = Archive::new(decoder);

    for entry in archive.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.into_owned();

        // 去掉首个路径组件；只有首层目录本身的条目直接跳过
        let stripped: PathBuf = path.components().skip(1).collect();
        if stripped.as_os_str().is_empty() {
            continue;
        }
        // 含 .. 的条目会逃出目标目录，直接拒绝整个归档
        if stripped
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(AppError::storage(&path, "归档条目路径越出目标目录"));
        }

        let out_path = dest.join(&stripped);
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        entry.unpack(&out_path)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::TempDir;

    /// 构造一个带 `go/` 首层目录的 tar.gz 测试归档
    fn build_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(encoder);

        for (path, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o755);
            // append_data/set_path 会拒绝含 `..` 的路径，直接写入 GNU 头的 name 字段
            // 以便构造越界条目的测试归档
            header.as_gnu_mut().unwrap().name[..path.len()].copy_from_slice(path.as_bytes());
            header.set_cksum();
            builder.append(&header, *data).unwrap();
        }

        builder.into_inner().unwrap().finish().unwrap()
    }

    #[test]
    fn test_unpack_strips_leading_component() {
        let archive = build_archive(&[
            ("go/VERSION", b"go1.22.1".as_slice()),
            ("go/bin/go", b"fake-binary".as_slice()),
            ("go/pkg/tool/compile", b"tool".as_slice()),
        ]);

        let dest = TempDir::new().unwrap();
        unpack_tar_gz(&archive, dest.path()).unwrap();

        assert_eq!(fs::read(dest.path().join("VERSION")).unwrap(), b"go1.22.1");
        assert!(dest.path().join("bin/go").is_file());
        assert!(dest.path().join("pkg/tool/compile").is_file());
        // 首层 go/ 目录已被剥掉
        assert!(!dest.path().join("go").exists());
    }

    #[test]
    fn test_unpack_rejects_parent_traversal() {
        let archive = build_archive(&[
            ("go/VERSION", b"go1.22.1".as_slice()),
            ("go/../escape", b"outside".as_slice()),
        ]);

        let outer = TempDir::new().unwrap();
        let dest = outer.path().join("dest");
        fs::create_dir(&dest).unwrap();

        let result = unpack_tar_gz(&archive, &dest);
        assert!(matches!(result, Err(AppError::Storage { .. })));
        // 越界条目没有落到目标目录之外
        assert!(!outer.path().join("escape").exists());
    }

    #[test]
    fn test_unpack_empty_archive_is_noop() {
        let archive = build_archive(&[]);
        let dest = TempDir::new().unwrap();
        unpack_tar_gz(&archive, dest.path()).unwrap();
        assert_eq!(fs::read_dir(dest.path()).unwrap().count(), 0);
    }
}
