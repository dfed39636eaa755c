use super::model::{Dialect, Gender, VoiceCategory, VoiceProfile};
use std::sync::LazyLock;

fn voice(
    id: &str,
    name: &str,
    gender: Gender,
    voice_type: &str,
    category: VoiceCategory,
    description: &str,
) -> VoiceProfile {
    VoiceProfile {
        id: id.to_string(),
        name: name.to_string(),
        gender,
        voice_type: voice_type.to_string(),
        category,
        description: description.to_string(),
    }
}

static DIALECTS: LazyLock<Vec<Dialect>> = LazyLock::new(|| {
    vec![
        Dialect {
            id: "egyptian".to_string(),
            title: "المصرية".to_string(),
            profiles: vec![
                voice(
                    "egy_karim",
                    "كريم",
                    Gender::Male,
                    "عميق",
                    VoiceCategory::Doc,
                    "صوت وثائقي مصري عميق يناسب الأفلام والسرد الواقعي",
                ),
                voice(
                    "egy_salma",
                    "سلمى",
                    Gender::Female,
                    "دافئ",
                    VoiceCategory::Novels,
                    "أداء قصصي دافئ لروايات الكتب الصوتية",
                ),
                voice(
                    "egy_omar",
                    "عمر",
                    Gender::Male,
                    "شاب",
                    VoiceCategory::Youtube,
                    "إيقاع شبابي سريع لمحتوى المنصات",
                ),
                voice(
                    "egy_nour",
                    "نور",
                    Gender::Female,
                    "حيوي",
                    VoiceCategory::Ads,
                    "نبرة إعلانية حماسية تجذب الانتباه",
                ),
            ],
        },
        Dialect {
            id: "saudi".to_string(),
            title: "السعودية".to_string(),
            profiles: vec![
                voice(
                    "sau_fahd",
                    "فهد",
                    Gender::Male,
                    "عميق",
                    VoiceCategory::Doc,
                    "صوت سعودي رزين للوثائقيات والمحتوى الرسمي",
                ),
                voice(
                    "sau_reem",
                    "ريم",
                    Gender::Female,
                    "هادئ",
                    VoiceCategory::Podcast,
                    "حوار بودكاست سعودي هادئ ومريح",
                ),
                voice(
                    "sau_turki",
                    "تركي",
                    Gender::Male,
                    "شاب",
                    VoiceCategory::Drama,
                    "أداء درامي شاب بنبرة نجدية واضحة",
                ),
                voice(
                    "sau_jude",
                    "جود",
                    Gender::Female,
                    "دافئ",
                    VoiceCategory::Novels,
                    "سرد روائي أنثوي دافئ",
                ),
            ],
        },
        Dialect {
            id: "khaleeji".to_string(),
            title: "الخليجية".to_string(),
            profiles: vec![
                voice(
                    "khl_nasser",
                    "ناصر",
                    Gender::Male,
                    "عميق",
                    VoiceCategory::Corporate,
                    "صوت مؤسسي خليجي واثق للعروض والشركات",
                ),
                voice(
                    "khl_moza",
                    "موزة",
                    Gender::Female,
                    "هادئ",
                    VoiceCategory::Edu,
                    "شرح تعليمي واضح بإيقاع متزن",
                ),
                voice(
                    "khl_saif",
                    "سيف",
                    Gender::Male,
                    "شاب",
                    VoiceCategory::Podcast,
                    "حوارات خليجية بيضاء مريحة",
                ),
                voice(
                    "khl_dana",
                    "دانة",
                    Gender::Female,
                    "دافئ",
                    VoiceCategory::Novels,
                    "حكايا خليجية بنبرة قصصية حانية",
                ),
            ],
        },
        Dialect {
            id: "levantine".to_string(),
            title: "الشامية".to_string(),
            profiles: vec![
                voice(
                    "lev_jad",
                    "جاد",
                    Gender::Male,
                    "هادئ",
                    VoiceCategory::Novels,
                    "راوي شامي عذب للقصص والروايات",
                ),
                voice(
                    "lev_lina",
                    "لينا",
                    Gender::Female,
                    "حيوي",
                    VoiceCategory::Cartoon,
                    "أداء كرتوني مرح للشخصيات المتحركة",
                ),
                voice(
                    "lev_samer",
                    "سامر",
                    Gender::Male,
                    "شاب",
                    VoiceCategory::Youtube,
                    "محتوى شبابي شامي خفيف الظل",
                ),
                voice(
                    "lev_maya",
                    "مايا",
                    Gender::Female,
                    "دافئ",
                    VoiceCategory::Podcast,
                    "بودكاست شامي بنبرة قريبة من المستمع",
                ),
            ],
        },
        Dialect {
            id: "sudanese".to_string(),
            title: "السودانية".to_string(),
            profiles: vec![
                voice(
                    "sud_taha",
                    "طه",
                    Gender::Male,
                    "عميق",
                    VoiceCategory::Doc,
                    "صوت سوداني وقور بإيقاع دافئ متمهل",
                ),
                voice(
                    "sud_awadia",
                    "عوضية",
                    Gender::Female,
                    "دافئ",
                    VoiceCategory::Novels,
                    "سرد قصصي سوداني حميم",
                ),
                voice(
                    "sud_musab",
                    "مصعب",
                    Gender::Male,
                    "شاب",
                    VoiceCategory::Podcast,
                    "حوار سوداني شبابي ودود",
                ),
            ],
        },
        Dialect {
            id: "yemeni".to_string(),
            title: "اليمنية".to_string(),
            profiles: vec![
                voice(
                    "yem_hamdan",
                    "حمدان",
                    Gender::Male,
                    "هادئ",
                    VoiceCategory::Doc,
                    "صوت يمني مدني واضح ومباشر",
                ),
                voice(
                    "yem_balqees",
                    "بلقيس",
                    Gender::Female,
                    "دافئ",
                    VoiceCategory::Novels,
                    "حكايات يمنية بلهجة بيضاء لطيفة",
                ),
                voice(
                    "yem_akram",
                    "أكرم",
                    Gender::Male,
                    "شاب",
                    VoiceCategory::Edu,
                    "شرح تعليمي يمني سلس",
                ),
            ],
        },
        Dialect {
            id: "lebanese".to_string(),
            title: "اللبنانية".to_string(),
            profiles: vec![
                voice(
                    "leb_elie",
                    "إيلي",
                    Gender::Male,
                    "شاب",
                    VoiceCategory::Ads,
                    "إعلانات لبنانية أنيقة بإيقاع عصري",
                ),
                voice(
                    "leb_yara",
                    "يارا",
                    Gender::Female,
                    "حيوي",
                    VoiceCategory::Podcast,
                    "بودكاست لبناني راقٍ بنبرة موسيقية",
                ),
                voice(
                    "leb_fadi",
                    "فادي",
                    Gender::Male,
                    "هادئ",
                    VoiceCategory::Novels,
                    "راوي لبناني هادئ للقصص المسائية",
                ),
            ],
        },
        Dialect {
            id: "fusha".to_string(),
            title: "الفصحى".to_string(),
            profiles: vec![
                voice(
                    "fus_hassan",
                    "حسان",
                    Gender::Male,
                    "عميق",
                    VoiceCategory::Doc,
                    "فصحى معاصرة رصينة للوثائقيات والنشرات",
                ),
                voice(
                    "fus_mariam",
                    "مريم",
                    Gender::Female,
                    "هادئ",
                    VoiceCategory::Novels,
                    "سرد أدبي فصيح بمخارج سليمة",
                ),
                voice(
                    "fus_zaid",
                    "زيد",
                    Gender::Male,
                    "شاب",
                    VoiceCategory::Edu,
                    "محتوى تعليمي فصيح واضح النبرة",
                ),
                voice(
                    "fus_huda",
                    "هدى",
                    Gender::Female,
                    "دافئ",
                    VoiceCategory::Corporate,
                    "عروض مؤسسية بفصحى مهذبة",
                ),
            ],
        },
    ]
});

static ALL_PROFILES: LazyLock<Vec<VoiceProfile>> = LazyLock::new(|| {
    DIALECTS
        .iter()
        .flat_map(|d| d.profiles.iter().cloned())
        .collect()
});

/// Full dialect catalog, in display order.
pub fn dialects() -> &'static [Dialect] {
    &DIALECTS
}

pub fn dialect_by_id(id: &str) -> Option<&'static Dialect> {
    DIALECTS.iter().find(|d| d.id == id)
}

/// Default dialect for newly created projects.
pub fn default_dialect() -> &'static Dialect {
    &DIALECTS[0]
}

/// Voices of one dialect; the flattened catalog when the dialect is unknown.
pub fn pool_for_dialect(dialect_id: &str) -> &'static [VoiceProfile] {
    match dialect_by_id(dialect_id) {
        Some(dialect) => &dialect.profiles,
        None => &ALL_PROFILES,
    }
}

pub fn all_profiles() -> &'static [VoiceProfile] {
    &ALL_PROFILES
}

pub fn profile_by_name(name: &str) -> Option<&'static VoiceProfile> {
    ALL_PROFILES.iter().find(|p| p.name == name)
}

pub fn profile_by_id(id: &str) -> Option<&'static VoiceProfile> {
    ALL_PROFILES.iter().find(|p| p.id == id)
}
