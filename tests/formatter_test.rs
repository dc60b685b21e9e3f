use lithoformer::formatter::cloze::fill_cloze;
use lithoformer::formatter::text_cleaner::{clean_stem, normalize_sequence, strip_artifacts};
use lithoformer::formatter::{format_quiz, FormatterConfig, QuizFormatter};
use lithoformer::{Analysis, Distractor, QuestionType, QuizItem, QuizOptions};

fn math_config() -> FormatterConfig {
    FormatterConfig::new("Quiz", "Math")
}

fn two_plus_two() -> QuizItem {
    QuizItem::mcq(
        "What is 2+2?",
        QuizOptions::from_slice(&["3", "4", "5", "6", "", ""]),
        "B",
    )
}

fn answer_summary() -> QuizItem {
    QuizItem::mcq(
        "Place the steps in order: D, C, A, B.",
        QuizOptions::default(),
        "",
    )
}

#[test]
fn end_to_end_single_mcq() {
    assert_eq!(
        format_quiz(&[two_plus_two()], &math_config()),
        "<b>Quiz:<br>Math</b><br><br>[What is 2+2?<br>A. 3<br>B. 4<br>C. 5<br>D. 6]::(B)"
    );
}

#[test]
fn end_to_end_from_wire_json() {
    let json = r#"{"qtype":"MCQ","stem":"What is 2+2?","options":{"A":"3","B":"4","C":"5","D":"6","E":"","F":""},"answer":"B"}"#;
    let item: QuizItem = serde_json::from_str(json).unwrap();
    assert_eq!(format_quiz(&[item], &math_config()), format_quiz(&[two_plus_two()], &math_config()));
}

#[test]
fn cleanup_is_idempotent() {
    let samples = [
        "Which?\r\n\r\n\r\nA.\r\nCorrect answer:\r\nb. fake\r\nReal line, Not Selected",
        "§Pic.2§ caption\n\n\nMore text\nIncorrect Answer:",
        "\n\n  lonely  \n\n",
    ];
    for raw in samples {
        let once = clean_stem(raw);
        assert_eq!(strip_artifacts(&once), once, "sample: {raw:?}");
        assert_eq!(clean_stem(&once), once, "sample: {raw:?}");
    }
}

#[test]
fn cloze_fills_every_marker_in_order() {
    let fills: Vec<String> = ["alpha", "beta", "gamma"].iter().map(|s| s.to_string()).collect();

    for stem in [
        "{{x}} then {{}} then {{z}}.",
        "____ then _____ then ___.",
    ] {
        let rendered = fill_cloze(stem, &fills);
        let positions: Vec<usize> = fills
            .iter()
            .map(|fill| rendered.find(&format!("{{{{{fill}}}}}")).unwrap())
            .collect();
        assert_eq!(rendered.matches("{{").count(), 3);
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }
}

#[test]
fn sequence_normalization() {
    assert_eq!(normalize_sequence("• B,A, C ,D"), "B,A,C,D");
    assert_eq!(normalize_sequence("b, a"), "B,A");
}

#[test]
fn misdetected_cloze_is_rendered_as_mcq() {
    let mut item = QuizItem::cloze("The capital is {{Paris}}.", vec!["Paris".to_string()]);
    item.options.b = "Paris".to_string();
    item.options.a = "Rome".to_string();
    item.answer = "B".to_string();

    assert_eq!(
        format_quiz(&[item], &math_config()),
        "<b>Quiz:<br>Math</b><br><br>[The capital is _______.<br>A. Rome<br>B. Paris]::(B)"
    );
}

#[test]
fn answer_summary_is_dropped() {
    assert_eq!(format_quiz(&[answer_summary()], &math_config()), "");
}

#[test]
fn picture_only_mcq_gets_letter_options() {
    let item = QuizItem::mcq("Which graph fits? §Pic.1§", QuizOptions::default(), "C");
    assert_eq!(
        format_quiz(&[item], &math_config()),
        "<b>Quiz:<br>Math</b><br><br>[Which graph fits?<br>§Pic.1§<br>A. A<br>B. B<br>C. C<br>D. D]::(C)"
    );
}

#[test]
fn long_separator_runs_are_collapsed() {
    let item = QuizItem::mcq(
        "Pick one",
        QuizOptions::from_slice(&["3<br><br><br><br>three", "4"]),
        "A",
    );
    let text = format_quiz(&[item], &math_config());
    assert!(!text.contains("<br><br><br>"));
    assert!(text.contains("A. 3<br><br>three"));
}

#[test]
fn numbering_skips_dropped_records() {
    let config = math_config().with_question_start(100);
    let items = vec![two_plus_two(), answer_summary(), two_plus_two()];

    let text = QuizFormatter::new(config).format(&items);
    let blocks: Vec<&str> = text.split('\n').collect();

    assert_eq!(blocks.len(), 2);
    assert!(blocks[0].ends_with("<div style=\"text-align: right;\">L000101</div>"));
    assert!(blocks[1].ends_with("<div style=\"text-align: right;\">L000102</div>"));
}

#[test]
fn batch_code_precedes_question_code() {
    let config = math_config()
        .with_batch_code("261016A002")
        .with_question_start(0)
        .with_question_prefix("Q");
    let text = format_quiz(&[two_plus_two()], &config);
    assert!(text.ends_with(
        "]::(B)<div style=\"text-align: right;\">261016A002</div>\
         <div style=\"text-align: right;\">Q000001</div>"
    ));
}

#[test]
fn bilingual_mcq_with_analysis() {
    let mut item = two_plus_two();
    item.stem_translation = "2+2 等于几？".to_string();
    item.options_translation = QuizOptions::from_slice(&["三", "四"]);
    item.analysis = Some(Analysis {
        domain: "算术".to_string(),
        rationale: "2 加 2 等于 4".to_string(),
        key_points: vec!["加法交换律".to_string()],
        distractors: vec![Distractor {
            option: "A".to_string(),
            reason: "少了 1".to_string(),
        }],
    });

    assert_eq!(
        format_quiz(&[item], &math_config()),
        "<b>Quiz:<br>Math</b><br><br>\
         [What is 2+2?<br>((::2+2 等于几？))<br>A. 3<br>((::三))<br>B. 4<br>((::四))<br>C. 5<br>D. 6]::(B)\
         <br><br>[[解析::<br>\
         <div>领域：算术</div><div>为什么选 b（4）</div><div>2 加 2 等于 4</div>\
         <div><br></div><div>相关知识：</div><div>加法交换律</div>\
         <div><br></div><div>其他选项为什么不如 b：</div><div>A. 少了 1</div>]]<br>"
    );
}

#[test]
fn order_question_recovers_sequences_from_stem() {
    let item = QuizItem::order(
        "Put the steps in order.\nA. Boil water\nB. Add tea\nB, A\nA, B",
        vec![
            "A. Boil water".to_string(),
            "B. Add tea, Not Selected".to_string(),
            "C.".to_string(),
        ],
        QuizOptions::default(),
        "B",
    );

    assert_eq!(
        format_quiz(&[item], &math_config()),
        "<b>Quiz:<br>Math</b><br><br>\
         [Put the steps in order.<br> A. Boil water<br> B. Add tea<br>A. B,A<br>B. A,B]::(B)"
    );
}

#[test]
fn summary_filter_runs_before_cloze_recovery() {
    // CLOZE 标签且没有选项：过滤条件不成立，原样保留
    let summary = QuizItem::cloze("Place the steps in order: D, C, A, B.", Vec::new());
    let text = format_quiz(&[summary], &math_config());
    assert!(text.ends_with("Place the steps in order: D, C, A, B."));

    // CLOZE 标签但有选项：不是答案汇总，恢复为选择题
    let mut recovered = QuizItem::cloze("Pick {{one}}: A, B.", Vec::new());
    recovered.options = QuizOptions::from_slice(&["x", "y"]);
    recovered.answer = "A".to_string();
    let text = format_quiz(&[recovered], &math_config());
    assert!(text.ends_with("[Pick _______: A, B.<br>A. x<br>B. y]::(A)"));
}

#[test]
fn cloze_question_with_translation() {
    let mut item = QuizItem::cloze(
        "Water boils at ____ degrees.",
        vec!["100".to_string()],
    );
    item.stem_translation = "水在 ____ 度沸腾。".to_string();
    assert_eq!(item.qtype, QuestionType::Cloze);

    assert_eq!(
        format_quiz(&[item], &math_config()),
        "<b>Quiz:<br>Math</b><br><br>Water boils at {{100}} degrees.<br>((::水在 ____ 度沸腾。))"
    );
}

#[test]
fn blocks_keep_input_order_and_are_newline_joined() {
    let first = QuizItem::mcq("First?", QuizOptions::from_slice(&["x", "y"]), "A");
    let second = QuizItem::cloze("Second ___", vec!["z".to_string()]);
    let text = format_quiz(&[first, second], &math_config());

    let blocks: Vec<&str> = text.split('\n').collect();
    assert_eq!(blocks.len(), 2);
    assert!(blocks[0].contains("[First?"));
    assert!(blocks[1].ends_with("Second {{z}}"));
}
