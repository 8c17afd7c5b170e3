use crate::models::Gender;

/// Word lists used to fill synthetic profiles for one gender
pub struct Vocabulary {
    pub names: &'static [&'static str],
    pub bios: &'static [&'static str],
    pub hobbies: &'static [&'static str],
    pub music: &'static [&'static str],
    pub travel: &'static [&'static str],
    pub food: &'static [&'static str],
}

pub fn for_gender(gender: Gender) -> &'static Vocabulary {
    match gender {
        Gender::Female => &FEMALE,
        Gender::Male => &MALE,
        Gender::Other => &OTHER,
    }
}

const HOBBIES: &[&str] = &[
    "Classical dance",
    "Yoga",
    "Reading",
    "Painting",
    "Cooking",
    "Photography",
    "Gardening",
    "Writing poetry",
    "Singing",
    "Meditation",
    "Fashion design",
    "Playing sitar",
    "Kathak",
    "Bharatanatyam",
    "Sketching mehendi designs",
    "Cricket",
    "Trekking",
    "Chess",
    "Cycling",
    "Playing guitar",
];

const MUSIC: &[&str] = &[
    "Bollywood classics",
    "Indian classical",
    "Sufi music",
    "Indie pop",
    "Folk music",
    "Fusion",
    "Ghazals",
    "Contemporary Bollywood",
    "Punjabi music",
    "Tamil songs",
    "Carnatic music",
    "Instrumental",
];

const TRAVEL: &[&str] = &[
    "Rajasthan palaces",
    "Kerala backwaters",
    "Himalayan retreats",
    "Goa beaches",
    "Historical monuments of Delhi",
    "Varanasi ghats",
    "Ladakh monasteries",
    "Hampi ruins",
    "Northeast valleys",
    "Andaman islands",
    "Mysore heritage sites",
    "Darjeeling tea gardens",
];

const FOOD: &[&str] = &[
    "Homemade biryani",
    "Street food",
    "South Indian cuisine",
    "North Indian thali",
    "Bengali sweets",
    "Gujarati food",
    "Punjabi dishes",
    "Coastal seafood",
    "Hyderabadi cuisine",
    "Rajasthani food",
    "Maharashtrian dishes",
    "Kerala cuisine",
];

static FEMALE: Vocabulary = Vocabulary {
    names: &[
        "Aanya", "Diya", "Zara", "Kiara", "Myra", "Shanaya", "Ananya", "Aisha", "Riya",
        "Aaradhya", "Avni", "Ishani", "Tara", "Saanvi", "Pari", "Aditi", "Advika",
        "Ahana", "Amaira", "Anvi", "Aria", "Avisha", "Disha", "Divya", "Ira", "Kyra",
        "Mishka", "Navya", "Nisha", "Prisha", "Rhea", "Saisha", "Siya", "Vanya",
    ],
    bios: &[
        "A free spirit with a love for Indian traditions and modern thinking. Looking for someone who appreciates both worlds.",
        "Passionate about art and culture, always exploring new ways to express creativity through traditional and contemporary forms.",
        "Adventure seeker with a deep connection to my roots. Love traveling and discovering hidden gems in our beautiful country.",
        "Tech professional by day, classical dancer by evening. Seeking someone who understands the balance of career and passion.",
        "Bookworm who loves discussing everything from ancient philosophy to modern literature. Looking for intellectual conversations.",
        "Foodie who enjoys experimenting with fusion recipes. Would love to share culinary adventures with someone special.",
        "Nature enthusiast and yoga practitioner. Seeking a like-minded soul who values wellness and spiritual growth.",
        "Creative soul with a camera always in hand. Love capturing the beauty of everyday moments and Indian festivities.",
        "Ambitious professional who believes in the perfect blend of career and family values. Looking for someone with similar priorities.",
        "Music lover and trained classical singer. Hoping to find someone who appreciates the harmony of life.",
    ],
    hobbies: HOBBIES,
    music: MUSIC,
    travel: TRAVEL,
    food: FOOD,
};

static MALE: Vocabulary = Vocabulary {
    names: &[
        "Aarav", "Vihaan", "Vivaan", "Aditya", "Arjun", "Sai", "Reyansh", "Krishna",
        "Ishaan", "Shaurya", "Atharv", "Advik", "Pranav", "Rudra", "Kabir", "Ayaan",
        "Dhruv", "Karan", "Rohan", "Aryan", "Dev", "Nikhil", "Rahul", "Siddharth",
        "Varun", "Yash", "Neel", "Om", "Manav", "Tejas",
    ],
    bios: &[
        "Engineer who unwinds with long drives and old Bollywood songs. Looking for someone to share chai and stories with.",
        "Weekend trekker and weekday coder. Seeking a partner in crime for spontaneous mountain trips.",
        "Cricket fanatic who can also cook a mean biryani. Believe the best conversations happen over good food.",
        "Entrepreneur at heart with strong family values. Looking for someone ambitious, kind and curious.",
        "Amateur photographer chasing sunsets across the country. Would love a travel companion with an eye for beauty.",
        "Guitar player and lifelong learner. Hoping to meet someone who enjoys quiet evenings and deep conversations.",
        "Fitness enthusiast who starts every day with yoga. Looking for someone who values health and laughter.",
        "Bookworm with a soft spot for history and mythology. Seeking someone who loves to debate ideas.",
        "Foodie exploring every street stall in the city. Let's find the best golgappa together.",
        "Calm, grounded and a little nerdy. Looking for genuine connection over small talk.",
    ],
    hobbies: HOBBIES,
    music: MUSIC,
    travel: TRAVEL,
    food: FOOD,
};

static OTHER: Vocabulary = Vocabulary {
    names: &[
        "Ari", "Kiran", "Noor", "Sam", "Jai", "Avi", "Sasha", "Rumi", "Eshan",
        "Nika", "Alex", "Indu", "Ravi", "Shan", "Tanvi", "Yuvi", "Zuri", "Neha",
        "Ash", "Mira", "Ojas", "Roshni", "Veer", "Amal",
    ],
    bios: &[
        "Artist and storyteller who finds magic in everyday moments. Looking for someone open-hearted and curious.",
        "Plant parent, podcast addict and amateur chef. Seeking someone to share lazy Sundays with.",
        "Traveler collecting sunsets and street food memories. Would love to plan the next trip together.",
        "Tech by day, poetry by night. Hoping to find someone who enjoys both logic and feeling.",
        "Music is my language and dance my therapy. Looking for someone who is not afraid to be silly.",
        "Volunteer, reader and mountain lover. Seeking kindness, honesty and good conversation.",
        "Coffee over everything. Looking for someone to explore hidden cafes and bookstores with.",
        "Yoga practitioner and mindful wanderer. Hoping to meet someone who values growth and calm.",
    ],
    hobbies: HOBBIES,
    music: MUSIC,
    travel: TRAVEL,
    food: FOOD,
};
