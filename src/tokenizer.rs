use crate::types::ArgumentVector;

/// Splits a raw line into whitespace-delimited tokens. No quoting, no escapes.
pub fn tokenize(line: &[u8]) -> ArgumentVector {
	line.split(|c| c.is_ascii_whitespace())
		.filter(|word| !word.is_empty())
		.map(|word| String::from_utf8_lossy(word).into_owned())
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn splits_on_runs_of_whitespace() {
		assert_eq!(tokenize(b"  cat\t< in.txt |  wc -l\n"), vec!["cat", "<", "in.txt", "|", "wc", "-l"]);
	}

	#[test]
	fn blank_line_has_no_tokens() {
		assert!(tokenize(b" \t\n").is_empty());
		assert!(tokenize(b"").is_empty());
	}

	#[test]
	fn carriage_return_is_whitespace() {
		assert_eq!(tokenize(b"pwd\r\n"), vec!["pwd"]);
	}

	#[test]
	fn invalid_utf8_is_replaced_not_dropped() {
		assert_eq!(tokenize(b"echo \xff"), vec!["echo", "\u{fffd}"]);
	}

	#[test]
	fn operators_need_surrounding_whitespace() {
		assert_eq!(tokenize(b"echo a>b"), vec!["echo", "a>b"]);
	}
}
