/// Collapse line breaks and tabs in a job description into single spaces, then trim it.
///
/// CR-LF pairs are replaced before lone LF and CR characters so that a Windows line break
/// turns into one space rather than two. Runs of plain spaces are left untouched.
pub fn normalize(raw: &str) -> String {
    raw.replace("\r\n", " ")
        .replace('\n', " ")
        .replace('\r', " ")
        .replace('\t', " ")
        .trim()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALPHABET: [char; 5] = ['\r', '\n', '\t', ' ', 'a'];

    /// Every string of up to `max_len` characters drawn from `ALPHABET`.
    fn all_strings(max_len: usize) -> Vec<String> {
        let mut strings = vec![String::new()];
        let mut previous = vec![String::new()];

        for _ in 0..max_len {
            let next: Vec<String> = previous
                .iter()
                .flat_map(|prefix| {
                    ALPHABET.into_iter().map(move |c| {
                        let mut s = prefix.clone();
                        s.push(c);
                        s
                    })
                })
                .collect();
            strings.extend(next.iter().cloned());
            previous = next;
        }

        strings
    }

    #[test]
    fn test_collapses_crlf_into_a_single_space() {
        assert_eq!(normalize("Line1\r\nLine2\tEnd"), "Line1 Line2 End");
        assert_eq!(normalize("a\r\n\r\nb"), "a  b");
    }

    #[test]
    fn test_replaces_lone_line_breaks_and_tabs() {
        assert_eq!(normalize("a\nb"), "a b");
        assert_eq!(normalize("a\rb"), "a b");
        assert_eq!(normalize("a\n\rb"), "a  b");
        assert_eq!(normalize("a\t\tb"), "a  b");
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(normalize("\r\n\t  Senior engineer \n"), "Senior engineer");
        assert_eq!(normalize("\t\t\r\n"), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_keeps_interior_spaces() {
        assert_eq!(normalize("remote    only"), "remote    only");
    }

    #[test]
    fn test_leaves_other_characters_alone() {
        assert_eq!(normalize("Zürich – Ünïcode"), "Zürich – Ünïcode");
    }

    #[test]
    fn test_output_has_no_line_breaks_tabs_or_padding() {
        for input in all_strings(5) {
            let output = normalize(&input);

            assert!(
                !output.contains(['\r', '\n', '\t']),
                "{:?} normalized to {:?}",
                input,
                output
            );
            assert_eq!(output, output.trim(), "{:?} was not trimmed", input);
        }
    }

    #[test]
    fn test_is_idempotent() {
        for input in all_strings(5) {
            let once = normalize(&input);
            assert_eq!(normalize(&once), once, "{:?} is not stable", input);
        }
    }
}
