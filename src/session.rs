use crate::error::Error;
use crate::generate::{SYSTEM_PROMPT, TextGenerator, build_user_prompt};
use crate::images::{
    DEFAULT_IMAGE_COUNT, DestinationImage, DestinationImageResolver, ImageFetcher,
    collect_destination_images,
};
use crate::model::ItineraryDocument;
use crate::trip::TripRequest;
use crate::{ExportedDocument, export_itinerary};

/// One user's working state: the current itinerary plus the collaborators
/// that produce and export it. Every action runs to completion before the
/// next one starts.
pub struct TravelSession<G> {
    generator: G,
    resolver: DestinationImageResolver,
    itinerary: Option<ItineraryDocument>,
    image_count: usize,
}

impl<G: TextGenerator> TravelSession<G> {
    pub fn new(generator: G) -> Self {
        Self::with_resolver(generator, DestinationImageResolver::default())
    }

    pub fn with_resolver(generator: G, resolver: DestinationImageResolver) -> Self {
        Self {
            generator,
            resolver,
            itinerary: None,
            image_count: DEFAULT_IMAGE_COUNT,
        }
    }

    pub fn set_image_count(&mut self, count: usize) {
        self.image_count = count;
    }

    pub fn itinerary(&self) -> Option<&ItineraryDocument> {
        self.itinerary.as_ref()
    }

    pub fn resolver(&self) -> &DestinationImageResolver {
        &self.resolver
    }

    /// Validate, generate and replace the current itinerary. On any error the
    /// previous itinerary is left as it was.
    pub fn submit(&mut self, request: &TripRequest) -> Result<&ItineraryDocument, Error> {
        let meta = request.validate()?;
        log::info!(
            "Creating your personalized {}-day itinerary from {} to {}...",
            meta.day_count,
            meta.source_city,
            meta.destination
        );
        let user_prompt = build_user_prompt(request, meta.day_count);
        let text = self.generator.generate(SYSTEM_PROMPT, &user_prompt)?;
        Ok(&*self.itinerary.insert(ItineraryDocument::new(text, meta)))
    }

    /// Build the PDF for the current itinerary. Image failures only reduce
    /// the watermarks; a failed build keeps the itinerary for another try.
    pub fn export(&mut self, fetcher: &dyn ImageFetcher) -> Result<ExportedDocument, Error> {
        let Some(doc) = self.itinerary.as_ref() else {
            return Err(Error::Validation(
                "Generate a travel plan before exporting.".into(),
            ));
        };
        let images = collect_destination_images(
            &mut self.resolver,
            fetcher,
            &doc.trip_meta.destination,
            self.image_count,
        );
        export_itinerary(doc, images)
    }

    /// Preview background for the current destination, generic when there is none.
    pub fn background_image(&mut self) -> DestinationImage {
        let destination = self
            .itinerary
            .as_ref()
            .map(|doc| doc.trip_meta.destination.as_str())
            .unwrap_or("");
        self.resolver.resolve(destination)
    }

    pub fn reset(&mut self) {
        self.itinerary = None;
    }
}
