/// `show stat` の1列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Field {
    /// 列名
    pub name: &'static str,

    /// CSV上の列番号 (0始まり)
    pub index: usize,
}
impl Field {
    const fn new(name: &'static str, index: usize) -> Self {
        Field { name, index }
    }
}

/// スキーマの列数
/// これより列数の少ない行は読み捨てる
pub const FIELD_COUNT: usize = 51;

/// プロキシ名の列
pub const PROXY_NAME: Field = FIELDS[0];

/// サーバー名の列
pub const SERVER_NAME: Field = FIELDS[1];

/// HAProxy CSV統計の列定義 (列順)
pub const FIELDS: [Field; FIELD_COUNT] = [
    Field::new("pxname", 0),
    Field::new("svname", 1),
    Field::new("qcur", 2),
    Field::new("qmax", 3),
    Field::new("scur", 4),
    Field::new("smax", 5),
    Field::new("slim", 6),
    Field::new("stot", 7),
    Field::new("bin", 8),
    Field::new("bout", 9),
    Field::new("dreq", 10),
    Field::new("dresp", 11),
    Field::new("ereq", 12),
    Field::new("econ", 13),
    Field::new("eresp", 14),
    Field::new("wretr", 15),
    Field::new("wredis", 16),
    Field::new("status", 17),
    Field::new("weight", 18),
    Field::new("act", 19),
    Field::new("bck", 20),
    Field::new("chkfail", 21),
    Field::new("chkdown", 22),
    Field::new("lastchg", 23),
    Field::new("downtime", 24),
    Field::new("qlimit", 25),
    Field::new("pid", 26),
    Field::new("iid", 27),
    Field::new("sid", 28),
    Field::new("throttle", 29),
    Field::new("lbtot", 30),
    Field::new("tracked", 31),
    Field::new("type", 32),
    Field::new("rate", 33),
    Field::new("rate_lim", 34),
    Field::new("rate_max", 35),
    Field::new("check_status", 36),
    Field::new("check_code", 37),
    Field::new("check_duration", 38),
    Field::new("hrsp_1xx", 39),
    Field::new("hrsp_2xx", 40),
    Field::new("hrsp_3xx", 41),
    Field::new("hrsp_4xx", 42),
    Field::new("hrsp_5xx", 43),
    Field::new("hrsp_other", 44),
    Field::new("hanafail", 45),
    Field::new("req_rate", 46),
    Field::new("req_rate_max", 47),
    Field::new("req_tot", 48),
    Field::new("cli_abrt", 49),
    Field::new("srv_abrt", 50),
];

// 列番号は0から連続し、列名は重複しない
const _: () = assert!(is_consistent(&FIELDS));

const fn is_consistent(fields: &[Field]) -> bool {
    let mut i = 0;
    while i < fields.len() {
        if fields[i].index != i {
            return false;
        }
        let mut j = i + 1;
        while j < fields.len() {
            if str_eq(fields[i].name, fields[j].name) {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// 列名から列定義を引く
pub fn field(name: &str) -> Option<&'static Field> {
    FIELDS.iter().find(|f| f.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields() {
        // [正常系] 列定義は51列で連続している
        assert_eq!(FIELDS.len(), FIELD_COUNT);
        for (i, f) in FIELDS.iter().enumerate() {
            assert_eq!(f.index, i);
        }
        assert_eq!(FIELDS[0].name, "pxname");
        assert_eq!(FIELDS[FIELD_COUNT - 1].name, "srv_abrt");

        // [正常系] キー列
        assert_eq!(PROXY_NAME, Field::new("pxname", 0));
        assert_eq!(SERVER_NAME, Field::new("svname", 1));
    }

    #[test]
    fn test_is_consistent() {
        // [正常系] 列定義表そのもの
        assert!(is_consistent(&FIELDS));

        // [異常系] 列番号の欠け
        let gap = [Field::new("pxname", 0), Field::new("svname", 2)];
        assert!(!is_consistent(&gap));

        // [異常系] 列名の重複
        let dup = [Field::new("pxname", 0), Field::new("pxname", 1)];
        assert!(!is_consistent(&dup));
    }

    #[test]
    fn test_field() {
        // [正常系] 既知の列名
        assert_eq!(field("status").map(|f| f.index), Some(17));
        assert_eq!(field("check_status").map(|f| f.index), Some(36));
        assert_eq!(field("srv_abrt").map(|f| f.index), Some(50));

        // [異常系] 未知の列名
        assert!(field("nonexistent").is_none());
        assert!(field("STATUS").is_none());
    }
}
