//! Deterministic identity generation from curated pools.
//!
//! Names, cities, and mail domains come from fixed lists so the same
//! RNG seed always produces the same customer roster. Emails embed the
//! customer's ordinal, which keeps them unique within one run; a
//! re-run over the same database produces the same addresses and the
//! store's skip-on-conflict handles the collision.

use crate::rng::StageRng;

pub struct NameGenerator;

impl NameGenerator {
    pub fn full_name(rng: &mut StageRng) -> (String, String) {
        let first = *rng.pick(Self::first_names());
        let last = *rng.pick(Self::last_names());
        (first.to_string(), last.to_string())
    }

    /// `first.last<ordinal>@domain` — lowercase, unique per ordinal.
    pub fn email(first: &str, last: &str, ordinal: usize, rng: &mut StageRng) -> String {
        let domain = *rng.pick(Self::mail_domains());
        format!(
            "{}.{}{}@{}",
            first.to_lowercase(),
            last.to_lowercase(),
            ordinal,
            domain
        )
    }

    /// NANP-shaped phone number with a 555 exchange.
    pub fn phone(rng: &mut StageRng) -> String {
        let area = *rng.pick(Self::area_codes());
        let line = rng.next_u64_below(10_000);
        format!("({area}) 555-{line:04}")
    }

    pub fn city_state(rng: &mut StageRng) -> (&'static str, &'static str) {
        *rng.pick(Self::cities())
    }

    fn first_names() -> &'static [&'static str] {
        &[
            "James", "Maria", "Robert", "Jennifer", "Michael", "Linda", "David", "Elizabeth",
            "William", "Susan", "Richard", "Jessica", "Joseph", "Sarah", "Thomas", "Karen",
            "Carlos", "Nancy", "Daniel", "Lisa", "Matthew", "Betty", "Anthony", "Margaret",
            "Mark", "Sandra", "Steven", "Ashley", "Andrew", "Emily", "Joshua", "Michelle",
            "Kevin", "Amanda", "Brian", "Melissa", "George", "Deborah", "Edward", "Stephanie",
            "Ronald", "Rebecca", "Timothy", "Laura", "Jason", "Helen", "Jeffrey", "Amy",
            "Ryan", "Angela", "Jacob", "Anna", "Gary", "Ruth", "Nicholas", "Brenda",
            "Eric", "Pamela", "Jonathan", "Nicole", "Stephen", "Katherine", "Larry", "Olivia",
        ]
    }

    fn last_names() -> &'static [&'static str] {
        &[
            "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis",
            "Rodriguez", "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson",
            "Thomas", "Taylor", "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson",
            "White", "Harris", "Sanchez", "Clark", "Ramirez", "Lewis", "Robinson", "Walker",
            "Young", "Allen", "King", "Wright", "Scott", "Torres", "Nguyen", "Hill", "Flores",
            "Green", "Adams", "Nelson", "Baker", "Hall", "Rivera", "Campbell", "Mitchell",
            "Carter", "Roberts", "Gomez", "Phillips", "Evans", "Turner", "Diaz", "Parker",
            "Cruz", "Edwards", "Collins", "Reyes", "Stewart", "Morris", "Morales", "Murphy",
        ]
    }

    fn mail_domains() -> &'static [&'static str] {
        &[
            "example.com",
            "mailbox.example.net",
            "inbox.example.org",
            "post.example.net",
        ]
    }

    fn area_codes() -> &'static [&'static str] {
        &["212", "305", "312", "404", "415", "512", "602", "617", "702", "713", "206", "303"]
    }

    fn cities() -> &'static [(&'static str, &'static str)] {
        &[
            ("New York", "NY"),
            ("Los Angeles", "CA"),
            ("Chicago", "IL"),
            ("Houston", "TX"),
            ("Phoenix", "AZ"),
            ("Philadelphia", "PA"),
            ("San Antonio", "TX"),
            ("San Diego", "CA"),
            ("Dallas", "TX"),
            ("Austin", "TX"),
            ("Seattle", "WA"),
            ("Denver", "CO"),
            ("Boston", "MA"),
            ("Atlanta", "GA"),
            ("Miami", "FL"),
            ("Las Vegas", "NV"),
        ]
    }
}
