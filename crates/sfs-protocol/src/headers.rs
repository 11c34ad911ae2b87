//! Typed HTTP response annotations emitted when a `DigestBlob` is present
//! on a response (spec §6): `X-Content-Length`, `X-Content-Volume`,
//! `X-Content-Position`.

use headers::{Error, Header, HeaderName, HeaderValue};
use once_cell::sync::Lazy;

static X_CONTENT_LENGTH: Lazy<HeaderName> = Lazy::new(|| HeaderName::from_static("x-content-length"));
static X_CONTENT_VOLUME: Lazy<HeaderName> = Lazy::new(|| HeaderName::from_static("x-content-volume"));
static X_CONTENT_POSITION: Lazy<HeaderName> =
    Lazy::new(|| HeaderName::from_static("x-content-position"));

fn decode_u64<'i, I>(values: &mut I) -> Result<u64, Error>
where
    I: Iterator<Item = &'i HeaderValue>,
{
    let first_value = values.next().ok_or_else(Error::invalid)?;
    let value_str = first_value.to_str().map_err(|_| Error::invalid())?;
    let value = value_str.parse::<u64>().map_err(|_| Error::invalid())?;

    if values.next().is_some() {
        return Err(Error::invalid());
    }

    Ok(value)
}

pub struct XContentLength(pub u64);

impl Header for XContentLength {
    fn name() -> &'static HeaderName {
        &X_CONTENT_LENGTH
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, Error>
    where
        Self: Sized,
        I: Iterator<Item = &'i HeaderValue>,
    {
        Ok(Self(decode_u64(values)?))
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        let value = HeaderValue::from_str(&self.0.to_string()).unwrap(); // a decimal string is always valid
        values.extend(std::iter::once(value))
    }
}

pub struct XContentPosition(pub u64);

impl Header for XContentPosition {
    fn name() -> &'static HeaderName {
        &X_CONTENT_POSITION
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, Error>
    where
        Self: Sized,
        I: Iterator<Item = &'i HeaderValue>,
    {
        Ok(Self(decode_u64(values)?))
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        let value = HeaderValue::from_str(&self.0.to_string()).unwrap();
        values.extend(std::iter::once(value))
    }
}

pub struct XContentVolume(pub String);

impl Header for XContentVolume {
    fn name() -> &'static HeaderName {
        &X_CONTENT_VOLUME
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, Error>
    where
        Self: Sized,
        I: Iterator<Item = &'i HeaderValue>,
    {
        let first_value = values.next().ok_or_else(Error::invalid)?;
        let as_str = first_value.to_str().map_err(|_| Error::invalid())?;

        if values.next().is_some() {
            return Err(Error::invalid());
        }

        Ok(Self(as_str.to_string()))
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        let value = HeaderValue::from_str(&self.0).unwrap_or_else(|_| HeaderValue::from_static(""));
        values.extend(std::iter::once(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use headers::HeaderMapExt;
    use http::HeaderMap;

    #[test]
    fn round_trips_content_length() {
        let mut map = HeaderMap::new();
        map.typed_insert(XContentLength(100));
        assert_eq!(map.typed_get::<XContentLength>().unwrap().0, 100);
    }

    #[test]
    fn round_trips_content_volume() {
        let mut map = HeaderMap::new();
        map.typed_insert(XContentVolume("vol-1".into()));
        assert_eq!(map.typed_get::<XContentVolume>().unwrap().0, "vol-1");
    }
}
