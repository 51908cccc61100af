/// Turns a title into a url slug.
///
/// Keeps ascii letters, digits, whitespace and dashes, lower-cases, joins
/// words with a single dash and trims dashes at both ends. The result may be
/// empty.
pub fn slugify(text: &str) -> String {
	let mut slug = String::with_capacity(text.len());

	for c in text.to_lowercase().chars() {
		match c {
			'a'..='z' | '0'..='9' => slug.push(c),
			c if c.is_whitespace() || c == '-' => {
				if !slug.is_empty() && !slug.ends_with('-') {
					slug.push('-');
				}
			}
			_ => {}
		}
	}

	while slug.ends_with('-') {
		slug.pop();
	}

	slug
}
