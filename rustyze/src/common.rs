/// A wrapped [`reqwest::Client`].
/// The Firestore REST surface works without a cookie jar, but some of the
/// image/CDN endpoints the app talks to keep a session cookie.
/// This struct takes advantage of Rust's static typing to make sure a fetcher
/// that requires cookies is never given a [`reqwest::Client`] without one.
pub struct Client<const COOKIES: bool>(pub reqwest::Client);

impl<const COOKIES: bool> Default for Client<COOKIES> {
    fn default() -> Self {
        Self(
            reqwest::Client::builder()
                .cookie_store(COOKIES)
                .build()
                .unwrap(),
        )
    }
}
