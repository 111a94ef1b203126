//! Shell-word splitting for the manual option strings.

/// Splits `input` into words the way a POSIX shell would, without any
/// expansion: whitespace separates words, single quotes are literal,
/// double quotes allow `\"`, `\\`, `\$` and `` \` `` escapes, and a
/// backslash outside quotes escapes the next character.
///
/// Never fails. An unterminated quote runs to the end of the input.
pub fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    // Distinguishes `''` (an empty word) from no word at all.
    let mut in_word = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                for q in chars.by_ref() {
                    if q == '\'' {
                        break;
                    }
                    current.push(q);
                }
            }
            '"' => {
                in_word = true;
                while let Some(q) = chars.next() {
                    match q {
                        '"' => break,
                        '\\' => match chars.peek() {
                            Some(&next @ ('"' | '\\' | '$' | '`')) => {
                                current.push(next);
                                chars.next();
                            }
                            _ => current.push('\\'),
                        },
                        _ => current.push(q),
                    }
                }
            }
            '\\' => {
                in_word = true;
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            _ => {
                in_word = true;
                current.push(c);
            }
        }
    }

    if in_word {
        words.push(current);
    }

    words
}

/// Renders an argument list as a single copy-pasteable shell line.
pub fn join_words<S: AsRef<str>>(words: &[S]) -> String {
    words
        .iter()
        .map(|w| quote_word(w.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote_word(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=,+@%^".contains(c));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_whitespace() {
        assert_eq!(
            split_words("  -hwaccel   cuda\t-threads 4 "),
            vec!["-hwaccel", "cuda", "-threads", "4"]
        );
    }

    #[test]
    fn test_empty() {
        assert!(split_words("").is_empty());
        assert!(split_words("   ").is_empty());
    }

    #[test]
    fn test_quotes() {
        assert_eq!(
            split_words(r#"-metadata title="My Movie" -vf 'scale=1280:-2, fps=30'"#),
            vec!["-metadata", "title=My Movie", "-vf", "scale=1280:-2, fps=30"]
        );
    }

    #[test]
    fn test_empty_quoted_word() {
        assert_eq!(split_words(r#"-a '' -b"#), vec!["-a", "", "-b"]);
    }

    #[test]
    fn test_escapes() {
        assert_eq!(
            split_words(r#"a\ b "c \"d\"" 'e\f'"#),
            vec!["a b", r#"c "d""#, r"e\f"]
        );
    }

    #[test]
    fn test_unterminated_quote() {
        assert_eq!(split_words(r#"-x "open end"#), vec!["-x", "open end"]);
    }

    #[test]
    fn test_join_quotes_when_needed() {
        let line = join_words(&["ffmpeg", "-i", "my clip.mov", "it's.mp4"]);
        assert_eq!(line, r#"ffmpeg -i 'my clip.mov' 'it'\''s.mp4'"#);
        assert_eq!(split_words(&line), vec!["ffmpeg", "-i", "my clip.mov", "it's.mp4"]);
    }
}
