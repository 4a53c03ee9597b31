//! pacman 版本号比较（epoch:version-release）

use std::cmp::Ordering;

/// 比较两个完整版本号，语义与 `vercmp` 命令一致
pub fn vercmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let (epoch1, ver1, rel1) = parse_evr(a);
    let (epoch2, ver2, rel2) = parse_evr(b);

    match rpmvercmp(epoch1, epoch2) {
        Ordering::Equal => {}
        other => return other,
    }
    match rpmvercmp(ver1, ver2) {
        Ordering::Equal => {}
        other => return other,
    }
    match (rel1, rel2) {
        (Some(r1), Some(r2)) => rpmvercmp(r1, r2),
        _ => Ordering::Equal,
    }
}

/// 拆分为 (epoch, version, release)，缺省 epoch 为 "0"
fn parse_evr(evr: &str) -> (&str, &str, Option<&str>) {
    let digits = evr.bytes().take_while(|b| b.is_ascii_digit()).count();

    let (epoch, rest) = if evr.as_bytes().get(digits) == Some(&b':') {
        let epoch = &evr[..digits];
        (if epoch.is_empty() { "0" } else { epoch }, &evr[digits + 1..])
    } else {
        ("0", evr)
    };

    match rest.rfind('-') {
        Some(pos) => (epoch, &rest[..pos], Some(&rest[pos + 1..])),
        None => (epoch, rest, None),
    }
}

/// 逐段比较：数字段与字母段交替，分隔符只看长度
fn rpmvercmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let s1 = a.as_bytes();
    let s2 = b.as_bytes();
    // one/two 指向当前段起点，p1/p2 向前扫描
    let (mut one, mut two) = (0usize, 0usize);
    let (mut p1, mut p2) = (0usize, 0usize);

    while p1 < s1.len() && p2 < s2.len() {
        while p1 < s1.len() && !s1[p1].is_ascii_alphanumeric() {
            p1 += 1;
        }
        while p2 < s2.len() && !s2[p2].is_ascii_alphanumeric() {
            p2 += 1;
        }

        if p1 >= s1.len() || p2 >= s2.len() {
            break;
        }

        // 分隔符长度不同直接决出大小
        if p1 - one != p2 - two {
            return (p1 - one).cmp(&(p2 - two));
        }

        one = p1;
        two = p2;

        let isnum = s1[p1].is_ascii_digit();
        if isnum {
            while p1 < s1.len() && s1[p1].is_ascii_digit() {
                p1 += 1;
            }
            while p2 < s2.len() && s2[p2].is_ascii_digit() {
                p2 += 1;
            }
        } else {
            while p1 < s1.len() && s1[p1].is_ascii_alphabetic() {
                p1 += 1;
            }
            while p2 < s2.len() && s2[p2].is_ascii_alphabetic() {
                p2 += 1;
            }
        }

        // 类型不同：数字段总是更新
        if two == p2 {
            return if isnum {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }

        let mut seg1 = &s1[one..p1];
        let mut seg2 = &s2[two..p2];

        if isnum {
            while seg1.first() == Some(&b'0') {
                seg1 = &seg1[1..];
            }
            while seg2.first() == Some(&b'0') {
                seg2 = &seg2[1..];
            }
            match seg1.len().cmp(&seg2.len()) {
                Ordering::Equal => {}
                other => return other,
            }
        }

        match seg1.cmp(seg2) {
            Ordering::Equal => {}
            other => return other,
        }

        one = p1;
        two = p2;
    }

    // 尾部从跳过分隔符之后的位置算起
    let rest1 = &s1[p1..];
    let rest2 = &s2[p2..];

    if rest1.is_empty() && rest2.is_empty() {
        return Ordering::Equal;
    }

    // 剩余的字母尾巴不能赢过空串：1.0alpha < 1.0 < 1.0.1
    let alpha1 = rest1.first().is_some_and(|c| c.is_ascii_alphabetic());
    let alpha2 = rest2.first().is_some_and(|c| c.is_ascii_alphabetic());
    if (rest1.is_empty() && !alpha2) || alpha1 {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}
