//! pacman -Si / -Qi 输出解析函数

use super::types::{Depend, PkgReason, RawPackage};
use chrono::{Local, NaiveDateTime, TimeZone};

/// 单个字段：键 + 值行（续行作为额外的值）
pub type InfoField = (String, Vec<String>);

/// 将 pacman -Si / -Qi 的输出按空行切成包信息块
///
/// 典型输出（LC_ALL=C）：
/// ```text
/// Name            : git
/// Optional Deps   : tk: gitk and git gui
///                   perl-libwww: git svn
/// ```
pub fn parse_info_blocks(output: &str) -> Vec<Vec<InfoField>> {
    let mut blocks = Vec::new();
    let mut fields: Vec<InfoField> = Vec::new();

    for line in output.lines() {
        if line.trim().is_empty() {
            if !fields.is_empty() {
                blocks.push(std::mem::take(&mut fields));
            }
            continue;
        }

        let is_continuation = line.starts_with(' ') || line.starts_with('\t');
        if is_continuation {
            if let Some(last) = fields.last_mut() {
                last.1.push(line.trim().to_string());
            }
            continue;
        }

        if let Some(colon_pos) = line.find(':') {
            let key = line[..colon_pos].trim();
            let value = line[colon_pos + 1..].trim();
            if !key.is_empty() {
                fields.push((key.to_string(), vec![value.to_string()]));
            }
        }
    }

    if !fields.is_empty() {
        blocks.push(fields);
    }

    blocks
}

/// 由字段块构建包；缺少 Name 时返回 None
pub fn raw_package_from_fields(fields: &[InfoField]) -> Option<RawPackage> {
    let mut pkg = RawPackage::default();

    for (key, values) in fields {
        let first = values.first().map(String::as_str).unwrap_or("");
        // 列表字段可能折行，续行与首行同样以双空格分隔
        let joined = values.join("  ");
        match key.as_str() {
            "Repository" => pkg.db_name = optional(first),
            "Name" => pkg.name = first.to_string(),
            "Version" => pkg.version = first.to_string(),
            "Description" => pkg.desc = optional(first),
            "Architecture" => pkg.arch = optional(first),
            "URL" => pkg.url = optional(first),
            "Licenses" => pkg.licenses = split_list(&joined),
            "Groups" => pkg.groups = split_list(&joined),
            "Provides" => pkg.provides = split_depends(&joined),
            "Depends On" => pkg.depends = split_depends(&joined),
            "Optional Deps" => {
                pkg.optdepends = values
                    .iter()
                    .filter(|v| !is_none(v))
                    .map(|v| Depend::parse(v.trim_end_matches("[installed]").trim()))
                    .collect();
            }
            "Required By" => pkg.required_by = split_list(&joined),
            "Optional For" => pkg.optional_for = split_list(&joined),
            "Conflicts With" => pkg.conflicts = split_depends(&joined),
            "Replaces" => pkg.replaces = split_depends(&joined),
            "Download Size" => pkg.size = parse_size(first),
            "Installed Size" => pkg.isize = parse_size(first),
            "Packager" => pkg.packager = optional(first),
            "Build Date" => pkg.build_date = parse_build_date(first),
            "Install Reason" => pkg.reason = parse_reason(first),
            "Validated By" => pkg.signed = first.contains("Signature"),
            _ => {}
        }
    }

    if pkg.name.is_empty() {
        None
    } else {
        Some(pkg)
    }
}

/// 解析整段输出为包列表
pub fn parse_packages(output: &str) -> Vec<RawPackage> {
    parse_info_blocks(output)
        .iter()
        .filter_map(|fields| raw_package_from_fields(fields))
        .collect()
}

fn is_none(value: &str) -> bool {
    let v = value.trim();
    v.is_empty() || v == "None"
}

fn optional(value: &str) -> Option<String> {
    if is_none(value) {
        None
    } else {
        Some(value.to_string())
    }
}

/// pacman 列表字段以两个空格分隔（许可证名本身可能含单个空格）
pub fn split_list(value: &str) -> Vec<String> {
    if is_none(value) {
        return Vec::new();
    }
    value
        .split("  ")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn split_depends(value: &str) -> Vec<Depend> {
    split_list(value).iter().map(|s| Depend::parse(s)).collect()
}

/// "4.50 MiB" -> 字节数
pub fn parse_size(value: &str) -> i64 {
    let mut parts = value.split_whitespace();
    let number: f64 = match parts.next().and_then(|n| n.parse().ok()) {
        Some(n) => n,
        None => return 0,
    };
    let exponent = match parts.next().unwrap_or("B") {
        "B" => 0,
        "KiB" => 1,
        "MiB" => 2,
        "GiB" => 3,
        "TiB" => 4,
        "PiB" => 5,
        other => {
            log::debug!("parse_size: 未知单位 {}", other);
            0
        }
    };
    (number * 1024f64.powi(exponent)).round() as i64
}

/// 构建时间：C locale 下的 `%c` 格式，或直接是 unix 秒
pub fn parse_build_date(value: &str) -> i64 {
    let value = value.trim();
    if let Ok(ts) = value.parse::<i64>() {
        return ts;
    }

    // "Sat Oct  5 10:25:51 2024"：日期可能带填充空格
    let normalized = value.split_whitespace().collect::<Vec<_>>().join(" ");
    match NaiveDateTime::parse_from_str(&normalized, "%a %b %d %H:%M:%S %Y") {
        Ok(naive) => Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.timestamp())
            .unwrap_or(0),
        Err(e) => {
            log::debug!("parse_build_date: 无法解析 '{}': {}", value, e);
            0
        }
    }
}

fn parse_reason(value: &str) -> PkgReason {
    if value.contains("dependency") {
        PkgReason::Depend
    } else {
        PkgReason::Explicit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package_manager::types::{DepMod, PkgHandle};

    const SYNC_OUTPUT: &str = "\
Repository      : extra
Name            : git
Version         : 2.46.0-1
Description     : the fast distributed version control system
Architecture    : x86_64
URL             : https://git-scm.com/
Licenses        : GPL-2.0-only
Groups          : None
Provides        : None
Depends On      : curl  expat  perl>=5.14.0  zlib
Optional Deps   : tk: gitk and git gui
                  perl-libwww: git svn
Conflicts With  : None
Replaces        : None
Download Size   : 6.50 MiB
Installed Size  : 27.35 MiB
Packager        : Christian Hesse <eworm@archlinux.org>
Build Date      : 1722528000
Validated By    : MD5 Sum  SHA-256 Sum  Signature

Repository      : core
Name            : zlib
Version         : 1:1.3.1-2
Description     : Compression library
Architecture    : x86_64
URL             : https://www.zlib.net/
Licenses        : Zlib
Groups          : None
Provides        : None
Depends On      : glibc
Optional Deps   : None
Conflicts With  : None
Replaces        : None
Download Size   : 92.00 KiB
Installed Size  : 382.00 B
Packager        : Unknown Packager
Build Date      : 0
Validated By    : SHA-256 Sum
";

    const LOCAL_OUTPUT: &str = "\
Name            : zlib
Version         : 1:1.3.1-1
Description     : Compression library
Architecture    : x86_64
URL             : https://www.zlib.net/
Licenses        : Zlib
Groups          : None
Provides        : None
Depends On      : glibc
Optional Deps   : None
Required By     : curl  git  libpng
Optional For    : None
Conflicts With  : None
Replaces        : None
Installed Size  : 382.00 B
Packager        : Unknown Packager
Build Date      : 0
Install Date    : 0
Install Reason  : Installed as a dependency for another package
Install Script  : No
Validated By    : Signature
";

    #[test]
    fn splits_blocks_and_keeps_continuations() {
        let blocks = parse_info_blocks(SYNC_OUTPUT);
        assert_eq!(blocks.len(), 2);
        let optdeps = blocks[0]
            .iter()
            .find(|(k, _)| k == "Optional Deps")
            .map(|(_, v)| v.clone())
            .unwrap();
        assert_eq!(optdeps, vec!["tk: gitk and git gui", "perl-libwww: git svn"]);
    }

    #[test]
    fn url_value_keeps_its_colon() {
        let pkgs = parse_packages(SYNC_OUTPUT);
        assert_eq!(pkgs[0].url.as_deref(), Some("https://git-scm.com/"));
    }

    #[test]
    fn parses_sync_package() {
        let pkgs = parse_packages(SYNC_OUTPUT);
        let git = &pkgs[0];
        assert_eq!(git.name(), "git");
        assert_eq!(git.db_name(), Some("extra"));
        assert_eq!(git.version(), "2.46.0-1");
        assert!(git.groups().is_empty());
        assert_eq!(git.depends().len(), 4);
        assert_eq!(git.depends()[2].name, "perl");
        assert_eq!(git.depends()[2].depmod, DepMod::Ge);
        assert_eq!(git.optdepends().len(), 2);
        assert_eq!(git.optdepends()[1].desc.as_deref(), Some("git svn"));
        assert_eq!(git.size(), (6.5 * 1024.0 * 1024.0) as i64);
        assert_eq!(git.build_date(), 1722528000);
        assert!(git.has_signature());

        let zlib = &pkgs[1];
        assert_eq!(zlib.size(), 92 * 1024);
        assert_eq!(zlib.isize(), 382);
        assert!(zlib.optdepends().is_empty());
        assert!(!zlib.has_signature());
    }

    #[test]
    fn parses_local_package() {
        let pkgs = parse_packages(LOCAL_OUTPUT);
        assert_eq!(pkgs.len(), 1);
        let zlib = &pkgs[0];
        assert_eq!(zlib.db_name(), None);
        assert_eq!(zlib.reason(), PkgReason::Depend);
        assert_eq!(zlib.compute_requiredby(), vec!["curl", "git", "libpng"]);
        assert!(zlib.compute_optionalfor().is_empty());
        assert!(zlib.has_signature());
    }

    #[test]
    fn installed_marker_is_dropped_from_optdeps() {
        let output = "Name            : foo\nVersion         : 1-1\nOptional Deps   : bar: extra [installed]\n";
        let pkgs = parse_packages(output);
        assert_eq!(pkgs[0].optdepends()[0].compute_string(), "bar: extra");
    }

    #[test]
    fn wrapped_list_fields_are_joined() {
        let output = "\
Name            : foo
Version         : 1-1
Depends On      : curl  expat
                  perl>=5.38  zlib
Required By     : a  b
                  c
";
        let pkgs = parse_packages(output);
        let foo = &pkgs[0];
        let names: Vec<&str> = foo.depends().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["curl", "expat", "perl", "zlib"]);
        assert_eq!(foo.depends()[2].depmod, DepMod::Ge);
        assert_eq!(foo.compute_requiredby(), vec!["a", "b", "c"]);
    }

    #[test]
    fn block_without_name_is_skipped() {
        assert!(parse_packages("Version         : 1.0\n").is_empty());
    }

    #[test]
    fn size_units() {
        assert_eq!(parse_size("0.00 B"), 0);
        assert_eq!(parse_size("512.00 B"), 512);
        assert_eq!(parse_size("1.00 KiB"), 1024);
        assert_eq!(parse_size("2.00 GiB"), 2 * 1024 * 1024 * 1024);
        assert_eq!(parse_size("garbage"), 0);
    }

    #[test]
    fn list_splitting_respects_double_spaces() {
        assert_eq!(
            split_list("GPL-2.0-only  custom:Some License"),
            vec!["GPL-2.0-only", "custom:Some License"]
        );
        assert!(split_list("None").is_empty());
    }

    #[test]
    fn build_date_from_c_locale() {
        let ts = parse_build_date("Thu Aug  1 16:00:00 2024");
        let expected = Local
            .with_ymd_and_hms(2024, 8, 1, 16, 0, 0)
            .earliest()
            .map(|dt| dt.timestamp())
            .unwrap();
        assert_eq!(ts, expected);
        assert_eq!(parse_build_date("not a date"), 0);
    }
}
