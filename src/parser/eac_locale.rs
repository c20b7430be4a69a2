//! Localized EAC label translation
//!
//! EAC writes its log in the user's interface language, so a Russian or
//! Spanish log carries the same structure under different labels. Each
//! locale table maps the localized header, setting labels, and value
//! tokens back to the canonical English strings; translation runs once
//! per segment, before the English grammar, and records the detected
//! language tag.
//!
//! Tables cover the locales the reference corpus exercises. A log in an
//! untabled language falls through untranslated and parses as far as
//! its English-identical structure allows.

use std::borrow::Cow;

/// One EAC interface language.
struct Locale {
    /// BCP 47 primary subtag
    tag: &'static str,
    /// Localized `EAC extraction logfile from` line prefix
    header: &'static str,
    /// Localized label → canonical label, longest first
    labels: &'static [(&'static str, &'static str)],
    /// Localized value token → canonical token, applied only on lines
    /// that carry a label
    values: &'static [(&'static str, &'static str)],
}

static LOCALES: &[Locale] = &[
    Locale {
        tag: "ru",
        header: "Отчёт EAC об извлечении, выполненном",
        labels: &[
            ("Отчёт EAC об извлечении, выполненном", "EAC extraction logfile from"),
            ("Используемый дисковод", "Used drive"),
            ("Режим чтения", "Read mode"),
            ("Использование точного потока", "Utilize accurate stream"),
            ("Отключение кэша аудио", "Defeat audio cache"),
            ("Отключение кэш аудио", "Defeat audio cache"),
            ("Использование указателей C2", "Make use of C2 pointers"),
            ("Коррекция смещения при чтении", "Read offset correction"),
            ("Совмещённая коррекция смещения при чтении/записи", "Combined read/write offset correction"),
            ("Способность читать области Lead-in и Lead-out", "Overread into Lead-In and Lead-Out"),
            ("Заполнение пропущенных сэмплов тишиной", "Fill up missing offset samples with silence"),
            ("Удаление блоков с тишиной в начале и конце", "Delete leading and trailing silent blocks"),
            ("При вычислениях CRC использовались нулевые сэмплы", "Null samples used in CRC calculations"),
            ("Использованный интерфейс", "Used interface"),
            ("Обработка пауз", "Gap handling"),
            ("Выходной формат", "Used output format"),
            ("Добавление тега ID3", "Add ID3 tag"),
            ("Выбранный диапазон", "Selected range"),
            ("Имя файла", "Filename"),
            ("Пиковый уровень", "Peak level"),
            ("Скорость извлечения", "Extraction speed"),
            ("Качество трека", "Track quality"),
            ("CRC теста", "Test CRC"),
            ("CRC копии", "Copy CRC"),
            ("Длина паузы", "Pre-gap length"),
            ("Копирование... OK", "Copy OK"),
            ("Копирование прервано", "Copy aborted"),
            ("Точно извлечено (доверие", "Accurately ripped (confidence"),
            ("Не может быть определено как точное (доверие", "Cannot be verified as accurate (confidence"),
            ("Трека нет в базе данных AccurateRip", "Track not present in AccurateRip database"),
            ("Все треки извлечены точно", "All tracks accurately ripped"),
            ("Проблема тайминга", "Timing problem"),
            ("Подозрительная позиция", "Suspicious position"),
            ("Пропущенные сэмплы", "Missing samples"),
            ("Ошибок не произошло", "No errors occurred"),
            ("Конец отчёта", "End of status report"),
            ("Трек", "Track"),
        ],
        values: &[
            ("Да", "Yes"),
            ("Нет", "No"),
            ("Достоверность", "Secure"),
            ("Пакетный", "Burst"),
            ("Быстрый", "Fast"),
            ("Добавлено к предыдущему треку", "Appended to previous track"),
            ("Оставлено (кроме HTOA)", "Appended to previous track, except for HTOA"),
            ("Не обнаружено, добавлено к предыдущему треку", "Not detected, thus appended to previous track"),
            ("Добавлено к следующему треку", "Appended to next track"),
            ("Удалено", "Left out"),
        ],
    },
    Locale {
        tag: "es",
        header: "Archivo Log de EAC para extracción desde",
        labels: &[
            ("Archivo Log de EAC para extracción desde", "EAC extraction logfile from"),
            ("Unidad utilizada", "Used drive"),
            ("Modo de Lectura", "Read mode"),
            ("Utilizar Accurate Stream", "Utilize accurate stream"),
            ("Desactivar caché de audio", "Defeat audio cache"),
            ("Utilizar punteros C2", "Make use of C2 pointers"),
            ("Corrección de Offset de lectura", "Read offset correction"),
            ("Sobreleer en Lead-In y Lead-Out", "Overread into Lead-In and Lead-Out"),
            ("Rellenar muestras ausentes con silencios", "Fill up missing offset samples with silence"),
            ("Eliminar bloques silenciosos iniciales y finales", "Delete leading and trailing silent blocks"),
            ("Muestras nulas usadas en los cálculos de CRC", "Null samples used in CRC calculations"),
            ("Interfaz utilizada", "Used interface"),
            ("Manejo de Gap", "Gap handling"),
            ("Formato de salida utilizado", "Used output format"),
            ("Añadir etiqueta ID3", "Add ID3 tag"),
            ("Rango seleccionado", "Selected range"),
            ("Nombre de archivo", "Filename"),
            ("Nivel Pico", "Peak level"),
            ("Velocidad de extracción", "Extraction speed"),
            ("Calidad de pista", "Track quality"),
            ("CRC de Test", "Test CRC"),
            ("CRC de Copia", "Copy CRC"),
            ("Copia OK", "Copy OK"),
            ("Copia cancelada", "Copy aborted"),
            ("Extraído con precisión (confianza", "Accurately ripped (confidence"),
            ("No se puede verificar su precisión (confianza", "Cannot be verified as accurate (confidence"),
            ("Pista no presente en la base de datos AccurateRip", "Track not present in AccurateRip database"),
            ("Todas las pistas extraídas con precisión", "All tracks accurately ripped"),
            ("Problema de sincronización", "Timing problem"),
            ("Posición sospechosa", "Suspicious position"),
            ("No hubo errores", "No errors occurred"),
            ("Fin del informe de estado", "End of status report"),
            ("Pista", "Track"),
        ],
        values: &[
            ("Sí", "Yes"),
            ("Seguro", "Secure"),
            ("Ráfaga", "Burst"),
            ("Rápido", "Fast"),
            ("Anexado a pista anterior", "Appended to previous track"),
        ],
    },
    Locale {
        tag: "de",
        header: "EAC Auslese-Logdatei vom",
        labels: &[
            ("EAC Auslese-Logdatei vom", "EAC extraction logfile from"),
            ("Benutztes Laufwerk", "Used drive"),
            ("Lesemodus", "Read mode"),
            ("Benutze Accurate Stream", "Utilize accurate stream"),
            ("Audio Cache deaktivieren", "Defeat audio cache"),
            ("Benutze C2 Pointer", "Make use of C2 pointers"),
            ("Leseoffsetkorrektur", "Read offset correction"),
            ("Überlesen in Lead-In und Lead-Out", "Overread into Lead-In and Lead-Out"),
            ("Fülle fehlende Offsetsamples mit Stille", "Fill up missing offset samples with silence"),
            ("Lösche führende und nachfolgende stille Blöcke", "Delete leading and trailing silent blocks"),
            ("Null-Samples wurden bei CRC-Berechnungen benutzt", "Null samples used in CRC calculations"),
            ("Benutztes Interface", "Used interface"),
            ("Lückenbehandlung", "Gap handling"),
            ("Benutztes Ausgabeformat", "Used output format"),
            ("ID3 Tag hinzufügen", "Add ID3 tag"),
            ("Ausgewählter Bereich", "Selected range"),
            ("Dateiname", "Filename"),
            ("Spitzenpegel", "Peak level"),
            ("Auslesegeschwindigkeit", "Extraction speed"),
            ("Trackqualität", "Track quality"),
            ("Test CRC", "Test CRC"),
            ("Kopie CRC", "Copy CRC"),
            ("Kopie OK", "Copy OK"),
            ("Kopie abgebrochen", "Copy aborted"),
            ("Exakt ausgelesen (Sicherheit", "Accurately ripped (confidence"),
            ("Keine Fehler aufgetreten", "No errors occurred"),
            ("Ende des Statusberichts", "End of status report"),
            ("Track", "Track"),
        ],
        values: &[
            ("Ja", "Yes"),
            ("Nein", "No"),
            ("Sicher", "Secure"),
            ("Schnell", "Fast"),
            ("An vorherigen Track angehängt", "Appended to previous track"),
        ],
    },
    Locale {
        tag: "sv",
        header: "EAC extraheringsloggfil från",
        labels: &[
            ("EAC extraheringsloggfil från", "EAC extraction logfile from"),
            ("Använd enhet", "Used drive"),
            ("Läsläge", "Read mode"),
            ("Använd Accurate Stream", "Utilize accurate stream"),
            ("Inaktivera cache för ljud", "Defeat audio cache"),
            ("Använd C2-pekare", "Make use of C2 pointers"),
            ("Korrigering av läs-offset", "Read offset correction"),
            ("Överläsning in i Lead-In och Lead-Out", "Overread into Lead-In and Lead-Out"),
            ("Fyll upp saknade offset-samplingar med tystnad", "Fill up missing offset samples with silence"),
            ("Ta bort inledande och avslutande tysta block", "Delete leading and trailing silent blocks"),
            ("Nollsamplingar använda i CRC-beräkningar", "Null samples used in CRC calculations"),
            ("Använt gränssnitt", "Used interface"),
            ("Mellanrumshantering", "Gap handling"),
            ("Använt utdataformat", "Used output format"),
            ("Lägg till ID3-tagg", "Add ID3 tag"),
            ("Valt omfång", "Selected range"),
            ("Filnamn", "Filename"),
            ("Toppnivå", "Peak level"),
            ("Extraheringshastighet", "Extraction speed"),
            ("Spårkvalitet", "Track quality"),
            ("Test-CRC", "Test CRC"),
            ("Kopierings-CRC", "Copy CRC"),
            ("Kopiering OK", "Copy OK"),
            ("Kopiering avbruten", "Copy aborted"),
            ("Exakt extraherat (konfidens", "Accurately ripped (confidence"),
            ("Tidsproblem", "Timing problem"),
            ("Misstänkt position", "Suspicious position"),
            ("Inga fel uppstod", "No errors occurred"),
            ("Slut på statusrapport", "End of status report"),
            ("Spår", "Track"),
        ],
        values: &[
            ("Ja", "Yes"),
            ("Nej", "No"),
            ("Säker", "Secure"),
            ("Snabb", "Fast"),
            ("Tillagda till föregående spår", "Appended to previous track"),
        ],
    },
    Locale {
        tag: "it",
        header: "File di log EAC per l'estrazione del",
        labels: &[
            ("File di log EAC per l'estrazione del", "EAC extraction logfile from"),
            ("Unità utilizzata", "Used drive"),
            ("Modalità di lettura", "Read mode"),
            ("Utilizzo Accurate Stream", "Utilize accurate stream"),
            ("Disabilita cache audio", "Defeat audio cache"),
            ("Utilizzo puntatori C2", "Make use of C2 pointers"),
            ("Correzione offset in lettura", "Read offset correction"),
            ("Sovralettura nel Lead-In e Lead-Out", "Overread into Lead-In and Lead-Out"),
            ("Riempimento campioni mancanti con silenzio", "Fill up missing offset samples with silence"),
            ("Eliminazione blocchi muti iniziali e finali", "Delete leading and trailing silent blocks"),
            ("Campioni nulli usati nei calcoli CRC", "Null samples used in CRC calculations"),
            ("Interfaccia utilizzata", "Used interface"),
            ("Gestione dei gap", "Gap handling"),
            ("Formato di output utilizzato", "Used output format"),
            ("Aggiungi tag ID3", "Add ID3 tag"),
            ("Intervallo selezionato", "Selected range"),
            ("Nome file", "Filename"),
            ("Livello di picco", "Peak level"),
            ("Velocità di estrazione", "Extraction speed"),
            ("Qualità traccia", "Track quality"),
            ("CRC del test", "Test CRC"),
            ("CRC della copia", "Copy CRC"),
            ("Copia OK", "Copy OK"),
            ("Copia annullata", "Copy aborted"),
            ("Estratta accuratamente (confidenza", "Accurately ripped (confidence"),
            ("Nessun errore", "No errors occurred"),
            ("Fine del rapporto", "End of status report"),
            ("Traccia", "Track"),
        ],
        values: &[
            ("Sì", "Yes"),
            ("Sicura", "Secure"),
            ("Veloce", "Fast"),
            ("Accodati alla traccia precedente", "Appended to previous track"),
        ],
    },
    Locale {
        tag: "fr",
        header: "Journal d'extraction EAC depuis",
        labels: &[
            ("Journal d'extraction EAC depuis", "EAC extraction logfile from"),
            ("Lecteur utilisé", "Used drive"),
            ("Mode de lecture", "Read mode"),
            ("Utiliser Accurate Stream", "Utilize accurate stream"),
            ("Désactiver le cache audio", "Defeat audio cache"),
            ("Utiliser les pointeurs C2", "Make use of C2 pointers"),
            ("Correction de l'offset de lecture", "Read offset correction"),
            ("Sur-lecture dans le Lead-In et le Lead-Out", "Overread into Lead-In and Lead-Out"),
            ("Compléter les échantillons manquants par du silence", "Fill up missing offset samples with silence"),
            ("Supprimer les blocs silencieux de début et de fin", "Delete leading and trailing silent blocks"),
            ("Échantillons nuls utilisés dans les calculs CRC", "Null samples used in CRC calculations"),
            ("Interface utilisée", "Used interface"),
            ("Gestion des gaps", "Gap handling"),
            ("Format de sortie utilisé", "Used output format"),
            ("Ajouter un tag ID3", "Add ID3 tag"),
            ("Plage sélectionnée", "Selected range"),
            ("Nom du fichier", "Filename"),
            ("Niveau de crête", "Peak level"),
            ("Vitesse d'extraction", "Extraction speed"),
            ("Qualité de la piste", "Track quality"),
            ("CRC du test", "Test CRC"),
            ("CRC de la copie", "Copy CRC"),
            ("Copie OK", "Copy OK"),
            ("Copie interrompue", "Copy aborted"),
            ("Extraction correcte (confiance", "Accurately ripped (confidence"),
            ("Aucune erreur", "No errors occurred"),
            ("Fin du rapport d'état", "End of status report"),
            ("Piste", "Track"),
        ],
        values: &[
            ("Oui", "Yes"),
            ("Non", "No"),
            ("Sécurisé", "Secure"),
            ("Rapide", "Fast"),
            ("Ajoutés à la piste précédente", "Appended to previous track"),
        ],
    },
    Locale {
        tag: "nl",
        header: "EAC uitlees logbestand van",
        labels: &[
            ("EAC uitlees logbestand van", "EAC extraction logfile from"),
            ("Gebruikte drive", "Used drive"),
            ("Uitleesmodus", "Read mode"),
            ("Gebruik Accurate Stream", "Utilize accurate stream"),
            ("Omzeil audio cache", "Defeat audio cache"),
            ("Gebruik C2 pointers", "Make use of C2 pointers"),
            ("Lees offset correctie", "Read offset correction"),
            ("Overlezen in Lead-In en Lead-Out", "Overread into Lead-In and Lead-Out"),
            ("Vul ontbrekende offset samples op met stilte", "Fill up missing offset samples with silence"),
            ("Verwijder stille blokken aan begin en eind", "Delete leading and trailing silent blocks"),
            ("Null samples gebruikt in CRC berekeningen", "Null samples used in CRC calculations"),
            ("Gebruikte interface", "Used interface"),
            ("Gap afhandeling", "Gap handling"),
            ("Gebruikt uitvoerformaat", "Used output format"),
            ("Voeg ID3 tag toe", "Add ID3 tag"),
            ("Geselecteerd bereik", "Selected range"),
            ("Bestandsnaam", "Filename"),
            ("Piekniveau", "Peak level"),
            ("Uitleessnelheid", "Extraction speed"),
            ("Trackkwaliteit", "Track quality"),
            ("Test CRC", "Test CRC"),
            ("Kopie CRC", "Copy CRC"),
            ("Kopie OK", "Copy OK"),
            ("Kopie afgebroken", "Copy aborted"),
            ("Nauwkeurig uitgelezen (vertrouwen", "Accurately ripped (confidence"),
            ("Geen fouten opgetreden", "No errors occurred"),
            ("Einde statusrapport", "End of status report"),
            ("Track", "Track"),
        ],
        values: &[
            ("Ja", "Yes"),
            ("Nee", "No"),
            ("Veilig", "Secure"),
            ("Snel", "Fast"),
            ("Toegevoegd aan vorige track", "Appended to previous track"),
        ],
    },
];

/// Localized `EAC extraction logfile` headers, for the segmenter and
/// detector signature tables.
pub fn localized_log_headers() -> impl Iterator<Item = &'static str> {
    LOCALES.iter().map(|l| l.header)
}

fn detect(text: &str) -> Option<&'static Locale> {
    LOCALES.iter().find(|l| text.contains(l.header))
}

/// Rewrite a localized EAC segment into canonical English labels.
/// Returns the text (borrowed when already English) and the detected
/// language tag.
pub fn translate(text: &str) -> (Cow<'_, str>, &'static str) {
    let Some(locale) = detect(text) else {
        return (Cow::Borrowed(text), "en");
    };
    tracing::debug!(language = locale.tag, "translating localized labels");

    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        let mut rewritten = line.to_owned();
        let mut labeled = false;
        for (local, english) in locale.labels {
            if rewritten.contains(local) {
                rewritten = rewritten.replace(local, english);
                labeled = true;
            }
        }
        // Value tokens only translate on lines that carried a label,
        // so free-text metadata (artist, titles) is left alone
        if labeled {
            for (local, english) in locale.values {
                if rewritten.contains(local) {
                    rewritten = rewritten.replace(local, english);
                }
            }
        }
        out.push_str(&rewritten);
        out.push('\n');
    }
    (Cow::Owned(out), locale.tag)
}
