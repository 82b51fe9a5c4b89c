use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ImageReference {
    Url(String),
    LocalPath(PathBuf),
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageReference::Url(url) => f.write_str(url),
            ImageReference::LocalPath(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Airplane wing over clouds.
pub const GENERIC_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1436491865332-7a61a109cc05?w=1200&q=80";

pub const GENERIC_LOCAL_BACKGROUND: &str = "generic_travel_bg.jpg";

// Order matters: substring matching takes the first hit.
const BUILTIN: &[(&str, &str)] = &[
    // Europe
    ("paris", "https://images.unsplash.com/photo-1502602898657-3e91760cbb34?w=1200&q=80"),
    ("london", "https://images.unsplash.com/photo-1513635269975-59663e0ac1ad?w=1200&q=80"),
    ("rome", "https://images.unsplash.com/photo-1552832230-c0197dd311b5?w=1200&q=80"),
    ("barcelona", "https://images.unsplash.com/photo-1583422409516-2895a77efded?w=1200&q=80"),
    ("amsterdam", "https://images.unsplash.com/photo-1534351590666-13e3e96b5017?w=1200&q=80"),
    ("venice", "https://images.unsplash.com/photo-1523906834658-6e24ef2386f9?w=1200&q=80"),
    ("athens", "https://images.unsplash.com/photo-1555993539-1732b0258235?w=1200&q=80"),
    ("prague", "https://images.unsplash.com/photo-1541849546-216549ae216d?w=1200&q=80"),
    ("istanbul", "https://images.unsplash.com/photo-1524231757912-21f4fe3a7200?w=1200&q=80"),
    ("vienna", "https://images.unsplash.com/photo-1516550893923-42d28e5677af?w=1200&q=80"),
    ("budapest", "https://images.unsplash.com/photo-1541963058-d826d34c14e1?w=1200&q=80"),
    ("lisbon", "https://images.unsplash.com/photo-1585208798174-6cedd86e019a?w=1200&q=80"),
    ("madrid", "https://images.unsplash.com/photo-1539037116277-4db20889f2d4?w=1200&q=80"),
    ("berlin", "https://images.unsplash.com/photo-1560969184-10fe8719e047?w=1200&q=80"),
    ("moscow", "https://images.unsplash.com/photo-1513326738677-b964603b136d?w=1200&q=80"),
    ("dublin", "https://images.unsplash.com/photo-1549918864-48ac978761a4?w=1200&q=80"),
    ("edinburgh", "https://images.unsplash.com/photo-1555881675-ac4a4241c1e7?w=1200&q=80"),
    ("santorini", "https://images.unsplash.com/photo-1570077188670-e3a8d69ac5ff?w=1200&q=80"),
    ("switzerland", "https://images.unsplash.com/photo-1527668752968-14dc70a27c95?w=1200&q=80"),
    ("zurich", "https://images.unsplash.com/photo-1563301088-dd4ce16d5611?w=1200&q=80"),
    // Asia
    ("tokyo", "https://images.unsplash.com/photo-1540959733332-eab4deabeeaf?w=1200&q=80"),
    ("kyoto", "https://images.unsplash.com/photo-1493976040374-85c8e12f0c0e?w=1200&q=80"),
    ("dubai", "https://images.unsplash.com/photo-1512453979798-5ea266f8880c?w=1200&q=80"),
    ("singapore", "https://images.unsplash.com/photo-1525625293386-3f8f99389edd?w=1200&q=80"),
    ("bangkok", "https://images.unsplash.com/photo-1508009603885-50cf7c579365?w=1200&q=80"),
    ("hong kong", "https://images.unsplash.com/photo-1536599018102-9f803c140fc1?w=1200&q=80"),
    ("seoul", "https://images.unsplash.com/photo-1517154421773-0529f29ea451?w=1200&q=80"),
    ("bali", "https://images.unsplash.com/photo-1537996194471-e657df975ab4?w=1200&q=80"),
    ("maldives", "https://images.unsplash.com/photo-1514282401047-d79a71a590e8?w=1200&q=80"),
    ("phuket", "https://images.unsplash.com/photo-1589394815804-964ed0be2eb5?w=1200&q=80"),
    ("mumbai", "https://images.unsplash.com/photo-1570168007204-dfb528c6958f?w=1200&q=80"),
    ("delhi", "https://images.unsplash.com/photo-1587474260584-136574528ed5?w=1200&q=80"),
    ("karachi", "https://images.unsplash.com/photo-1588181680169-7f3ac63cbe4e?w=1200&q=80"),
    ("lahore", "https://images.unsplash.com/photo-1598127748100-48d56a1c684e?w=1200&q=80"),
    ("beijing", "https://images.unsplash.com/photo-1508804185872-d7badad00f7d?w=1200&q=80"),
    ("shanghai", "https://images.unsplash.com/photo-1537890030206-1c0d99b5a6db?w=1200&q=80"),
    ("hanoi", "https://images.unsplash.com/photo-1509966756634-9c23dd6e6815?w=1200&q=80"),
    ("kuala lumpur", "https://images.unsplash.com/photo-1596422846543-75c6fc197f07?w=1200&q=80"),
    ("taipei", "https://images.unsplash.com/photo-1508623177105-8f9c3b5b7adb?w=1200&q=80"),
    ("osaka", "https://images.unsplash.com/photo-1590253230532-a67f6bc61c9e?w=1200&q=80"),
    ("riyadh", "https://images.unsplash.com/photo-1591608971362-f08b2a75731a?w=1200&q=80"),
    ("jeddah", "https://images.unsplash.com/photo-1578895101408-1a36b834405b?w=1200&q=80"),
    ("kl", "https://images.unsplash.com/photo-1596422846543-75c6fc197f07?w=1200&q=80"),
    ("malaysia", "https://images.unsplash.com/photo-1596422846543-75c6fc197f07?w=1200&q=80"),
    // Americas
    ("new york", "https://images.unsplash.com/photo-1496442226666-8d4d0e62e6e9?w=1200&q=80"),
    ("los angeles", "https://images.unsplash.com/photo-1534190760961-74e8c1c5c3da?w=1200&q=80"),
    ("san francisco", "https://images.unsplash.com/photo-1501594907352-04cda38ebc29?w=1200&q=80"),
    ("las vegas", "https://images.unsplash.com/photo-1605833556294-ea5c7a74f97a?w=1200&q=80"),
    ("miami", "https://images.unsplash.com/photo-1533106497176-45ae19e68ba2?w=1200&q=80"),
    ("chicago", "https://images.unsplash.com/photo-1477959858617-67f85cf4f1df?w=1200&q=80"),
    ("vancouver", "https://images.unsplash.com/photo-1519575706483-221027bfbb31?w=1200&q=80"),
    ("toronto", "https://images.unsplash.com/photo-1517935706615-2717063c2225?w=1200&q=80"),
    ("mexico city", "https://images.unsplash.com/photo-1518659526054-e6d9b0244b28?w=1200&q=80"),
    ("cancun", "https://images.unsplash.com/photo-1570394782014-d18b9a5d2ed5?w=1200&q=80"),
    ("rio de janeiro", "https://images.unsplash.com/photo-1483729558449-99ef09a8c325?w=1200&q=80"),
    ("buenos aires", "https://images.unsplash.com/photo-1589909202802-8f4aadce1849?w=1200&q=80"),
    ("lima", "https://images.unsplash.com/photo-1531968455001-5c5272a41129?w=1200&q=80"),
    ("machu picchu", "https://images.unsplash.com/photo-1587595431973-160d0d94add1?w=1200&q=80"),
    // Middle East & Africa
    ("cairo", "https://images.unsplash.com/photo-1572252009286-268acec5ca0a?w=1200&q=80"),
    ("jerusalem", "https://images.unsplash.com/photo-1566814534947-46a09bccd284?w=1200&q=80"),
    ("marrakech", "https://images.unsplash.com/photo-1597212618440-806262de4f6b?w=1200&q=80"),
    ("cape town", "https://images.unsplash.com/photo-1580060839134-75a5edca2e99?w=1200&q=80"),
    ("nairobi", "https://images.unsplash.com/photo-1611348524140-53c9a25263d6?w=1200&q=80"),
    // Oceania
    ("sydney", "https://images.unsplash.com/photo-1506973035872-a4ec16b8e8d9?w=1200&q=80"),
    ("melbourne", "https://images.unsplash.com/photo-1514395462725-fb4566210144?w=1200&q=80"),
    ("auckland", "https://images.unsplash.com/photo-1507699622108-4be3abd695ad?w=1200&q=80"),
    ("fiji", "https://images.unsplash.com/photo-1559827260-dc66d52bef19?w=1200&q=80"),
];

const LOCAL_BACKGROUNDS: &[(&str, &str)] = &[
    ("paris", "paris_bg.jpg"),
    ("tokyo", "tokyo_bg.jpg"),
    ("new york", "nyc_bg.jpg"),
    ("karachi", "karachi_bg.jpg"),
    ("athens", "athens_bg.jpg"),
];

/// Immutable, ordered destination → image mapping plus a generic fallback.
#[derive(Clone, Debug)]
pub struct Catalog {
    entries: Vec<(String, ImageReference)>,
    fallback: ImageReference,
}

impl Catalog {
    /// Keys are normalized (trimmed, lower-cased); a repeated key keeps its
    /// first position.
    pub fn new<K: AsRef<str>>(
        entries: impl IntoIterator<Item = (K, ImageReference)>,
        fallback: ImageReference,
    ) -> Self {
        let mut out: Vec<(String, ImageReference)> = Vec::new();
        for (key, reference) in entries {
            let key = key.as_ref().trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            match out.iter_mut().find(|(k, _)| *k == key) {
                Some(existing) => existing.1 = reference,
                None => out.push((key, reference)),
            }
        }
        Self {
            entries: out,
            fallback,
        }
    }

    pub fn builtin() -> Self {
        Self::new(
            BUILTIN
                .iter()
                .map(|&(key, url)| (key, ImageReference::Url(url.to_string()))),
            ImageReference::Url(GENERIC_IMAGE_URL.to_string()),
        )
    }

    /// Local background files under `dir`. Entries whose file is missing are
    /// left out so lookups fall through to the next candidate.
    pub fn local_backgrounds(dir: &Path) -> Self {
        let entries = LOCAL_BACKGROUNDS.iter().filter_map(|&(key, file)| {
            let path = dir.join(file);
            if path.exists() {
                Some((key, ImageReference::LocalPath(path)))
            } else {
                log::debug!("Local background missing for {key}: {}", path.display());
                None
            }
        });
        Self::new(
            entries,
            ImageReference::LocalPath(dir.join(GENERIC_LOCAL_BACKGROUND)),
        )
    }

    pub fn get(&self, key: &str) -> Option<&ImageReference> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, reference)| reference)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &ImageReference)> {
        self.entries.iter().map(|(k, r)| (k.as_str(), r))
    }

    pub fn fallback(&self) -> &ImageReference {
        &self.fallback
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
