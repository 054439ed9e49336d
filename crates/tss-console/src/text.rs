//! User-visible strings in both display languages.

use tss_core::{
    config::Language,
    errors::{Error, GatewayError},
    events::{Event, Question},
    ports::NoticeKind,
};

/// Fixed strings of the menus and prompts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Text {
    MainMenuTitle,
    MenuLogin,
    MenuApi,
    MenuProxy,
    MenuScrape,
    MenuTransfer,
    MenuExport,
    MenuQuick,
    MenuSettings,
    MenuExit,
    ChooseOption,
    InvalidChoice,
    PressEnter,
    LoginRequired,
    Goodbye,
    Interrupted,
    UnexpectedError,

    LoginTitle,
    AvailableSessions,
    ChooseSession,
    NewSessionName,
    AskPhone,
    AskCode,
    AskPassword,
    LoginFailed,
    LoggedInAs,

    CredentialsTitle,
    AskApiId,
    AskApiHash,
    CredentialsSaved,
    ApiNotConfigured,

    ProxyTitle,
    AskUseProxy,
    AskProxyType,
    AskProxyHost,
    AskProxyPort,
    AskProxyUser,
    AskProxyPass,
    ProxySaved,
    ProxyDisabled,
    InvalidProxy,
    HttpProxyUnsupported,

    SettingsTitle,
    AskLanguage,
    AskDelay,
    AskMaxMembers,
    SettingsSaved,
    CurrentValue,

    AskGroupLink,
    AskMemberLimit,
    FilterTitle,
    FilterAll,
    FilterAdmins,
    FilterActive,
    FilterUsername,
    ChooseFilter,
    AskSource,
    AskTarget,
    AskMembersFile,
    QuickTransferInfo,
    AskContinue,
    AskMessageLimit,
    InvalidNumber,

    ScrapeError,
    TransferError,
    ExportError,
    ConfigError,
    ConfigLoadFailed,
    ConfigSectionInvalid,
    RtlUnavailable,
}

impl Text {
    pub fn tr(self, lang: Language) -> &'static str {
        let (en, ar) = match self {
            Self::MainMenuTitle => ("Main Menu", "القائمة الرئيسية"),
            Self::MenuLogin => ("Log in", "تسجيل الدخول"),
            Self::MenuApi => ("API settings", "إعدادات API"),
            Self::MenuProxy => ("Proxy settings", "إعدادات البروكسي"),
            Self::MenuScrape => ("Scrape group members", "جمع أعضاء المجموعة"),
            Self::MenuTransfer => ("Transfer members between groups", "نقل الأعضاء بين المجموعات"),
            Self::MenuExport => ("Export group messages", "تصدير رسائل المجموعة"),
            Self::MenuQuick => ("Quick transfer", "النقل السريع"),
            Self::MenuSettings => ("General settings", "الإعدادات العامة"),
            Self::MenuExit => ("Exit", "الخروج"),
            Self::ChooseOption => ("Choose an option", "اختر خياراً"),
            Self::InvalidChoice => ("Invalid choice", "اختيار غير صحيح"),
            Self::PressEnter => ("Press Enter to continue...", "اضغط Enter للمتابعة..."),
            Self::LoginRequired => ("You must log in first", "يجب تسجيل الدخول أولاً"),
            Self::Goodbye => ("Goodbye!", "مع السلامة!"),
            Self::Interrupted => ("Program stopped", "تم إيقاف البرنامج"),
            Self::UnexpectedError => ("Unexpected error", "خطأ غير متوقع"),

            Self::LoginTitle => ("Log in", "تسجيل الدخول"),
            Self::AvailableSessions => ("Available sessions:", "الجلسات المتاحة:"),
            Self::ChooseSession => (
                "Choose a session number or 0 for a new session",
                "اختر رقم الجلسة أو أدخل 0 لجلسة جديدة",
            ),
            Self::NewSessionName => ("Enter a name for the new session", "أدخل اسم للجلسة الجديدة"),
            Self::AskPhone => (
                "Enter phone number (with country code, e.g. +963123456789)",
                "أدخل رقم الهاتف (مع مفتاح الدولة، مثال: +963123456789)",
            ),
            Self::AskCode => ("Enter the login code you received", "أدخل رمز الدخول الذي وصلك"),
            Self::AskPassword => (
                "Enter your two-step verification password",
                "أدخل كلمة مرور التحقق بخطوتين",
            ),
            Self::LoginFailed => ("Login failed", "فشل تسجيل الدخول"),
            Self::LoggedInAs => ("Logged in as", "تم تسجيل الدخول كـ"),

            Self::CredentialsTitle => ("API credentials setup", "إعداد بيانات الدخول"),
            Self::AskApiId => ("Enter API ID (from my.telegram.org)", "أدخل API ID (من my.telegram.org)"),
            Self::AskApiHash => ("Enter API Hash", "أدخل API Hash"),
            Self::CredentialsSaved => ("Credentials saved", "تم حفظ بيانات الدخول"),
            Self::ApiNotConfigured => (
                "API credentials are not configured. Set them up first.",
                "لم يتم إعداد بيانات API. الرجاء إعدادها أولاً.",
            ),

            Self::ProxyTitle => ("VPN/Proxy connection setup", "إعداد اتصال VPN/Proxy"),
            Self::AskUseProxy => ("Use a proxy? (y/n)", "هل تريد استخدام بروكسي؟ (y/n)"),
            Self::AskProxyType => ("Proxy type (socks5/http)", "نوع البروكسي (socks5/http)"),
            Self::AskProxyHost => ("Proxy address", "عنوان البروكسي"),
            Self::AskProxyPort => ("Proxy port", "منفذ البروكسي"),
            Self::AskProxyUser => (
                "Username (leave empty if none)",
                "اسم المستخدم (اتركه فارغاً إن لم يكن موجوداً)",
            ),
            Self::AskProxyPass => (
                "Password (leave empty if none)",
                "كلمة المرور (اتركه فارغاً إن لم يكن موجوداً)",
            ),
            Self::ProxySaved => ("Proxy settings saved", "تم حفظ إعدادات البروكسي"),
            Self::ProxyDisabled => ("Proxy disabled", "تم تعطيل البروكسي"),
            Self::InvalidProxy => ("Invalid proxy settings", "إعدادات بروكسي غير صالحة"),
            Self::HttpProxyUnsupported => (
                "HTTP proxies are not supported by the client, connecting directly",
                "بروكسي HTTP غير مدعوم، سيتم الاتصال مباشرة",
            ),

            Self::SettingsTitle => ("General settings", "الإعدادات العامة"),
            Self::AskLanguage => ("Language (arabic/english)", "اللغة (arabic/english)"),
            Self::AskDelay => (
                "Delay between requests in seconds",
                "التأخير بين الطلبات بالثواني",
            ),
            Self::AskMaxMembers => (
                "Maximum members per request",
                "الحد الأقصى للأعضاء في كل طلب",
            ),
            Self::SettingsSaved => ("Settings saved", "تم حفظ الإعدادات"),
            Self::CurrentValue => ("current", "الحالي"),

            Self::AskGroupLink => ("Enter the group link", "أدخل رابط المجموعة"),
            Self::AskMemberLimit => (
                "Maximum members (leave empty for all)",
                "الحد الأقصى للأعضاء (اتركه فارغاً للجميع)",
            ),
            Self::FilterTitle => ("Member filter", "تصفية الأعضاء"),
            Self::FilterAll => ("All members", "جميع الأعضاء"),
            Self::FilterAdmins => ("Admins only", "الإداريين فقط"),
            Self::FilterActive => ("Active members", "الأعضاء النشطين"),
            Self::FilterUsername => ("Members with usernames", "الأعضاء مع معرفات"),
            Self::ChooseFilter => ("Choose a filter", "اختر نوع التصفية"),
            Self::AskSource => ("Source group link", "رابط المجموعة المصدر"),
            Self::AskTarget => ("Target group link", "رابط المجموعة الهدف"),
            Self::AskMembersFile => (
                "Members file path (optional, leave empty to scrape)",
                "مسار ملف الأعضاء (اختياري، اتركه فارغاً لجمع جديد)",
            ),
            Self::QuickTransferInfo => (
                "Quick transfer - move all members from one group to another",
                "النقل السريع - نقل جميع الأعضاء من مجموعة إلى أخرى",
            ),
            Self::AskContinue => ("Continue? (y/n)", "هل تريد المتابعة؟ (y/n)"),
            Self::AskMessageLimit => (
                "Number of messages (default 1000)",
                "عدد الرسائل (افتراضي 1000)",
            ),
            Self::InvalidNumber => ("Please enter a valid number", "الرجاء إدخال رقم صحيح"),

            Self::ScrapeError => ("Error while collecting members", "خطأ في جمع الأعضاء"),
            Self::TransferError => ("Transfer error", "خطأ في النقل"),
            Self::ExportError => ("Error while collecting messages", "خطأ في جمع الرسائل"),
            Self::ConfigError => ("Configuration error", "خطأ في الإعدادات"),
            Self::ConfigLoadFailed => (
                "Could not read the config file, using defaults",
                "تعذر قراءة ملف الإعدادات، سيتم استخدام القيم الافتراضية",
            ),
            Self::ConfigSectionInvalid => (
                "Invalid config section, using its defaults until it is saved again",
                "قسم إعدادات غير صالح، سيتم استخدام القيم الافتراضية حتى يتم حفظه من جديد",
            ),
            Self::RtlUnavailable => (
                "Arabic text shaping is not available in this build, text is shown as is",
                "تشكيل النص العربي غير متوفر في هذه النسخة",
            ),
        };
        match lang {
            Language::English => en,
            Language::Arabic => ar,
        }
    }
}

/// Lines (with their notice kind) that render one event.
pub fn render_event(lang: Language, event: &Event) -> Vec<(NoticeKind, String)> {
    let ar = lang == Language::Arabic;
    let one = |text: String| vec![(event.kind(), text)];

    match event {
        Event::ResolvingGroup => one(pick(ar, "جمع معلومات المجموعة...", "Collecting group information...")),
        Event::GroupInfo { title } => one(if ar {
            format!("المجموعة: {title}")
        } else {
            format!("Group: {title}")
        }),
        Event::SourceGroup { title } => one(if ar {
            format!("المصدر: {title}")
        } else {
            format!("Source: {title}")
        }),
        Event::TargetGroup { title } => one(if ar {
            format!("الهدف: {title}")
        } else {
            format!("Target: {title}")
        }),
        Event::ScrapeStarted => one(pick(ar, "بدأ جمع الأعضاء...", "Collecting members...")),
        Event::MembersCollected { matched, seen } => one(if ar {
            format!("تم جمع {matched} من {seen} عضو")
        } else {
            format!("Collected {matched} of {seen} members")
        }),
        Event::MembersSaved { count, path } => one(if ar {
            format!("تم حفظ {count} عضو في {}", path.display())
        } else {
            format!("Saved {count} members to {}", path.display())
        }),
        Event::NoMembersMatched => one(pick(
            ar,
            "لم يتم العثور على أعضاء مطابقين للمعايير",
            "No members matched the criteria",
        )),
        Event::MessagesStarted => one(pick(ar, "جمع الرسائل...", "Collecting messages...")),
        Event::MessagesCollected { count } => one(if ar {
            format!("تم جمع {count} رسالة")
        } else {
            format!("Collected {count} messages")
        }),
        Event::MessagesSaved { count, json, txt } => {
            let (saved, json_label, txt_label) = if ar {
                (format!("تم حفظ {count} رسالة"), "• ملف JSON", "• ملف نصي")
            } else {
                (format!("Saved {count} messages"), "• JSON file", "• Text file")
            };
            vec![
                (NoticeKind::Success, saved),
                (NoticeKind::Info, format!("{json_label}: {}", json.display())),
                (NoticeKind::Info, format!("{txt_label}: {}", txt.display())),
            ]
        }
        Event::NoMessages => one(pick(ar, "لم يتم العثور على رسائل", "No messages found")),
        Event::MembersLoaded { count, path } => one(if ar {
            format!("تم تحميل {count} عضو من الملف {}", path.display())
        } else {
            format!("Loaded {count} members from {}", path.display())
        }),
        Event::MembersFileMissing { path } => one(if ar {
            format!("ملف الأعضاء {} غير موجود، سيتم جمع الأعضاء من جديد", path.display())
        } else {
            format!("Members file {} not found, scraping the source group", path.display())
        }),
        Event::NoMembersToTransfer => one(pick(ar, "لا يوجد أعضاء لنقلهم", "No members to transfer")),
        Event::TransferCancelled => one(pick(ar, "تم إلغاء النقل", "Transfer cancelled")),
        Event::MemberTransferred {
            position,
            total,
            name,
        } => one(if ar {
            format!("[{position}/{total}] تم نقل: {name}")
        } else {
            format!("[{position}/{total}] Transferred: {name}")
        }),
        Event::RateLimited { seconds } => one(if ar {
            format!("تم تقييد الحساب، الانتظار {seconds} ثانية...")
        } else {
            format!("Account is rate limited, waiting {seconds} seconds...")
        }),
        Event::MemberFailed {
            name,
            error,
            precondition,
        } => one(match (ar, precondition) {
            (true, true) => format!("فشل نقل عضو ({name}): {error}"),
            (true, false) => format!("خطأ غير متوقع ({name}): {error}"),
            (false, true) => format!("Failed to transfer {name}: {error}"),
            (false, false) => format!("Unexpected error for {name}: {error}"),
        }),
        Event::TransferComplete {
            transferred,
            failed,
            report,
        } => {
            let lines = if ar {
                [
                    "اكتمل النقل!".to_string(),
                    format!("• تم نقل: {transferred} عضو"),
                    format!("• فشل: {failed} عضو"),
                    format!("• التقرير: {}", report.display()),
                ]
            } else {
                [
                    "Transfer complete!".to_string(),
                    format!("• Transferred: {transferred} members"),
                    format!("• Failed: {failed} members"),
                    format!("• Report: {}", report.display()),
                ]
            };
            let mut out = Vec::with_capacity(lines.len());
            for (i, line) in lines.into_iter().enumerate() {
                let kind = if i == 0 {
                    NoticeKind::Success
                } else {
                    NoticeKind::Info
                };
                out.push((kind, line));
            }
            out
        }
    }
}

pub fn render_question(lang: Language, question: &Question) -> String {
    match question {
        Question::ConfirmTransfer { count } => match lang {
            Language::Arabic => format!("هل تريد نقل {count} عضو؟ (y/n)"),
            Language::English => format!("Transfer {count} members? (y/n)"),
        },
    }
}

/// `"<context>: <detail>"` for an operation failure.
pub fn render_error(lang: Language, context: Text, err: &Error) -> String {
    let detail = match err {
        Error::NotLoggedIn => Text::LoginRequired.tr(lang).to_string(),
        Error::Gateway(GatewayError::GroupNotFound(r)) => match lang {
            Language::Arabic => format!("المجموعة غير موجودة أو خاصة: {r}"),
            Language::English => format!("group not found or private: {r}"),
        },
        Error::Config(msg) => format!("{}: {msg}", Text::ConfigError.tr(lang)),
        other => other.to_string(),
    };
    format!("{}: {detail}", context.tr(lang))
}

fn pick(ar: bool, ar_text: &str, en_text: &str) -> String {
    let text = if ar { ar_text } else { en_text };
    text.to_string()
}
