//! Fallback provider for plain URLs.

use std::rc::Rc;

use tracing::error;

use super::ResourceProvider;
use crate::decoder::ImageDecoder;
use crate::error::ResourceResult;
use crate::resource::{Handle, LoadState};
use crate::texture::Texture;

/// Catch-all provider with the empty protocol.
///
/// It must be registered before any other provider so that it is consulted
/// last. It only loads images, through the host [`ImageDecoder`]; every
/// other capability reports `NotImplemented`.
pub struct UrlResourceProvider {
    decoder: Rc<dyn ImageDecoder>,
}

impl UrlResourceProvider {
    pub fn new(decoder: Rc<dyn ImageDecoder>) -> Self {
        Self { decoder }
    }
}

impl ResourceProvider for UrlResourceProvider {
    fn protocol(&self) -> &str {
        ""
    }

    fn get_image_data(&self, url: &str, destination: &Handle<Texture>) -> ResourceResult<()> {
        destination.borrow_mut().set_load_state(LoadState::Pending);
        let destination = Rc::clone(destination);
        let source = url.to_string();
        self.decoder.decode(
            url,
            Box::new(move |result| {
                let outcome = result.and_then(|image| {
                    destination.borrow_mut().set_image_data(
                        image.width,
                        image.height,
                        image.pixels,
                        &source,
                    )
                });
                if let Err(e) = outcome {
                    error!("Exception when loading image {}: {}", source, e);
                    destination
                        .borrow_mut()
                        .set_load_state(LoadState::Failed(e.to_string()));
                }
            }),
        );
        Ok(())
    }
}
