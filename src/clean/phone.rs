use regex::Regex;

/// Area and mobile codes for the German numbering plan around Nuremberg,
/// already separated from the subscriber number by a space. A number
/// containing one of these needs no further splitting.
const PREFIXES_FIXED: &[&str] = &[
    "9131 ", "9135 ", "911 ", "9133 ", "320 ", "700 ", "800 ", "900 ",
    "1511 ", "1512 ", "1514 ", "1515 ", "1517 ", "160 ", "170 ", "171 ",
    "175 ", "1520 ", "1522 ", "1523 ", "1525 ", "162 ", "172 ", "173 ",
    "174 ", "1570 ", "1573 ", "1575 ", "1577 ", "1578 ", "163 ", "177 ",
    "178 ", "1590 ", "176 ", "179 ", "1516 ", "180 ",
];

/// Prefixes written in national form, without a country code.
const PREFIXES_4_DIGITS: &[&str] = &[
    "0911", "0320", "0700", "0800", "0900", "0160", "0170", "0171", "0175",
    "0162", "0172", "0173", "0174", "0163", "0177", "0178", "0176", "0179",
    "0180",
];

const PREFIXES_5_DIGITS: &[&str] = &[
    "09131", "09135", "09133", "01511", "01512", "01514", "01515", "01517",
    "01520", "01522", "01523", "01525", "01570", "01573", "01575", "01577",
    "01578", "01590", "01516", "09128",
];

/// The same prefixes as written after a +49 country code (no trunk zero).
const PREFIXES_INTERNATIONAL_3_DIGITS: &[&str] = &[
    "911", "951", "320", "700", "800", "900", "160", "170", "171", "175",
    "162", "172", "173", "174", "163", "177", "178", "176", "179", "180",
];

const PREFIXES_INTERNATIONAL_4_DIGITS: &[&str] = &[
    "9131", "9135", "9133", "9132", "1511", "1512", "1514", "1515", "1517",
    "1520", "1522", "1523", "1525", "1570", "1573", "1575", "1577", "1578",
    "1590", "1516", "9128",
];

pub struct PhoneCleaner {
    junk: Regex,
    repeated_spaces: Regex,
    trunk_dash: Regex,
    well_formed: Regex,
}

impl PhoneCleaner {
    pub fn new() -> PhoneCleaner {
        PhoneCleaner {
            junk: Regex::new(r"[^0-9 +-]").unwrap(),
            repeated_spaces: Regex::new(r" +").unwrap(),
            // The leading alternative is a country code: a plus and two
            // digits, three characters in all.
            trunk_dash: Regex::new(r"^(\+\d{2}|\d{3,5})-").unwrap(),
            well_formed: Regex::new(r"^(\+\d{2}|\d{3,5}) \d").unwrap(),
        }
    }

    /// Acceptance pattern: area or country code, one space, then the number.
    pub fn is_well_formed(&self, number: &str) -> bool {
        self.well_formed.is_match(number)
    }

    /// Best-effort reformatting of a free-text phone number into
    /// "prefix SPACE number" form. Inputs with no recognizable prefix may come
    /// back unchanged.
    pub fn normalize(&self, raw: &str) -> String {
        // Everything that is not a digit, space, plus or minus becomes a space.
        let number = self.junk.replace_all(raw, " ");
        let number = self.repeated_spaces.replace_all(&number, " ");
        let mut number = number.into_owned();

        // A dash right after the area code is really a separator.
        if self.trunk_dash.is_match(&number) {
            number = number.replacen('-', " ", 1);
        }
        if number.starts_with(' ') {
            number.remove(0);
        }
        // Nothing left to split; indexing below would be meaningless.
        if number.is_empty() {
            return number;
        }

        // After the junk pass the string is plain ASCII, so byte positions are
        // character positions.
        if !PREFIXES_FIXED.iter().any(|code| number.contains(code)) {
            number = number.replace(' ', "");
            if number.starts_with('+') {
                // Country code is the three leading characters.
                number.insert(number.len().min(3), ' ');
                let after_country_code = number.get(4..).unwrap_or("");
                if PREFIXES_INTERNATIONAL_3_DIGITS
                    .iter()
                    .any(|code| after_country_code.starts_with(code))
                {
                    number.insert(7, ' ');
                } else if PREFIXES_INTERNATIONAL_4_DIGITS
                    .iter()
                    .any(|code| after_country_code.starts_with(code))
                {
                    number.insert(8, ' ');
                }
            } else if PREFIXES_4_DIGITS.iter().any(|code| number.starts_with(code)) {
                number.insert(4, ' ');
            } else if PREFIXES_5_DIGITS.iter().any(|code| number.starts_with(code)) {
                number.insert(5, ' ');
            }
            // "0049" is a malformed way of writing the country code.
            if number.contains("0049") {
                number = number.replace("0049", "+49 ");
            }
            if number.contains(" -") {
                number = number.replacen('-', "", 1);
            }
        }
        number
    }
}
