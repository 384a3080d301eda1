/// Creates a `String` backed newtype for a name, descriptor or signature.
///
/// The generated type can be created from `String` and `&str` without any checks, derefs to nothing (use
/// `as_str`) and can be looked up in maps with a `&str`, as its [`Hash`] and [`Eq`] are the ones of `str`.
macro_rules! make_string_like {
	(
		$( #[$doc:meta] )*
		$vis:vis $name:ident ;
	) => {
		$( #[$doc] )*
		#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
		$vis struct $name(String);

		impl $name {
			pub fn new(s: impl Into<String>) -> $name {
				$name(s.into())
			}

			pub fn as_str(&self) -> &str {
				&self.0
			}

			pub fn into_inner(self) -> String {
				self.0
			}
		}

		impl std::fmt::Display for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				f.write_str(&self.0)
			}
		}

		impl From<String> for $name {
			fn from(value: String) -> Self {
				$name(value)
			}
		}

		impl From<&str> for $name {
			fn from(value: &str) -> Self {
				$name(value.to_owned())
			}
		}

		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}

		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}

		impl std::borrow::Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}

		impl PartialEq<str> for $name {
			fn eq(&self, other: &str) -> bool {
				self.0 == other
			}
		}

		impl<'a> PartialEq<&'a str> for $name {
			fn eq(&self, other: &&'a str) -> bool {
				self.0 == *other
			}
		}
	}
}

pub(crate) use make_string_like;

/// Creates a struct with a `bool` for each access flag a kind of member can have.
///
/// Each flag is given with the bit it uses and the keyword it's printed as:
/// ```txt
/// make_access_flags!(
///     pub FieldAccess {
///         is_public = ACC_PUBLIC => "public",
///         is_static = ACC_STATIC => "static",
///     }
/// );
/// ```
/// The struct converts from and to the `u16` of the class file (dropping any bits it has no flag for), and so
/// implements [`Access`][crate::tree::access::Access]. Its [`Debug`] output lists the keywords of the set flags.
macro_rules! make_access_flags {
	(
		$( #[$doc:meta] )*
		$vis:vis $name:ident {
			$( $flag:ident = $bit:expr => $keyword:literal, )*
		}
	) => {
		$( #[$doc] )*
		#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
		$vis struct $name {
			$( pub $flag: bool, )*
		}

		impl std::fmt::Debug for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				f.write_str(concat!(stringify!($name), " { "))?;
				$(
					if self.$flag {
						f.write_str(concat!($keyword, " "))?;
					}
				)*
				f.write_str("}")
			}
		}

		impl From<u16> for $name {
			fn from(value: u16) -> Self {
				$name {
					$( $flag: value & $bit != 0, )*
				}
			}
		}

		impl From<$name> for u16 {
			fn from(value: $name) -> Self {
				let mut bits = 0;
				$(
					if value.$flag {
						bits |= $bit;
					}
				)*
				bits
			}
		}

		impl $crate::tree::access::Access for $name {}
	}
}

pub(crate) use make_access_flags;
