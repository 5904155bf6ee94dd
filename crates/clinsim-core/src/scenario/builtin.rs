//! The embedded default case catalog.
//!
//! Ships five levels per specialty across five specialties so the engine
//! works out of the box; additional case packs can be loaded from TOML
//! files.

use super::catalog::ScenarioCatalog;
use super::model::{Difficulty, ScenarioDefinition};
use crate::error::Result;
use serde::Deserialize;
use std::path::Path;

/// An in-memory scenario catalog.
///
/// `BuiltinCatalog::default()` carries the embedded case set;
/// `from_toml_path` loads a user-supplied case pack instead.
#[derive(Debug, Clone)]
pub struct BuiltinCatalog {
    scenarios: Vec<ScenarioDefinition>,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(rename = "scenario", default)]
    scenarios: Vec<ScenarioDefinition>,
}

impl BuiltinCatalog {
    /// Wraps an explicit scenario list (used by tests and embedders that
    /// build their own catalogs).
    pub fn new(scenarios: Vec<ScenarioDefinition>) -> Self {
        Self { scenarios }
    }

    /// Loads a catalog from a TOML case-pack file with `[[scenario]]`
    /// tables.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_toml_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let parsed: CatalogFile = toml::from_str(&raw)?;
        Ok(Self::new(parsed.scenarios))
    }
}

impl Default for BuiltinCatalog {
    fn default() -> Self {
        Self::new(default_cases())
    }
}

impl ScenarioCatalog for BuiltinCatalog {
    fn scenarios(&self) -> &[ScenarioDefinition] {
        &self.scenarios
    }
}

/// Returns the embedded default case set: levels 1-5 for each of the five
/// specialties, difficulty easy (1-2), medium (3), hard (4-5).
pub(crate) fn default_cases() -> Vec<ScenarioDefinition> {
    vec![
        // -------------------- neurology --------------------
        ScenarioDefinition {
            id: "neuro_1_tension_headache".into(),
            specialty: "neurology".into(),
            level: 1,
            difficulty: Difficulty::Easy,
            patient_name: "Rohan Verma".into(),
            age: 25,
            gender: "M".into(),
            chief_complaint: "Mild headache after long work days".into(),
            stages: vec![
                "You mostly get a mild, band-like headache around your forehead and the back of your head, usually after long days at work.".into(),
                "The pain feels like pressure or tightness, not throbbing, and it improves when you rest or relax.".into(),
                "You do not have nausea, vomiting, vision changes, or sensitivity to light or sound. It mostly comes on with stress.".into(),
            ],
            hints: vec![
                "Think about common headache types related to stress and muscle tension.".into(),
                "This type of headache is usually mild, bilateral, and feels like a tight band around the head.".into(),
            ],
            expected_diagnosis: "tension-type headache".into(),
            diagnosis_synonyms: vec!["tension-type headache".into(), "tension headache".into()],
            expected_treatment_keywords: vec![
                "paracetamol".into(),
                "acetaminophen".into(),
                "ibuprofen".into(),
                "NSAID".into(),
                "stress management".into(),
                "relaxation".into(),
                "lifestyle".into(),
            ],
        },
        ScenarioDefinition {
            id: "neuro_2_migraine_easy".into(),
            specialty: "neurology".into(),
            level: 2,
            difficulty: Difficulty::Easy,
            patient_name: "Priya Sharma".into(),
            age: 30,
            gender: "F".into(),
            chief_complaint: "Severe one-sided headaches".into(),
            stages: vec![
                "You get a severe, throbbing headache on one side of your head that can last for several hours.".into(),
                "During the headache, you feel nauseous and prefer to sit in a dark, quiet room because light and sound bother you.".into(),
                "Sometimes before the headache starts, you see flashing lights or zigzag lines in your vision for a short time.".into(),
            ],
            hints: vec![
                "Think of headaches that are often one-sided and throbbing, with light and sound sensitivity.".into(),
                "Some patients with this condition can have visual 'aura' before the pain starts.".into(),
            ],
            expected_diagnosis: "migraine".into(),
            diagnosis_synonyms: vec![],
            expected_treatment_keywords: vec![
                "triptan".into(),
                "sumatriptan".into(),
                "rizatriptan".into(),
                "NSAID".into(),
                "ibuprofen".into(),
                "paracetamol".into(),
            ],
        },
        ScenarioDefinition {
            id: "neuro_3_migraine_medium".into(),
            specialty: "neurology".into(),
            level: 3,
            difficulty: Difficulty::Medium,
            patient_name: "Ananya Gupta".into(),
            age: 27,
            gender: "F".into(),
            chief_complaint: "Recurrent severe headaches".into(),
            stages: vec![
                "You have been getting severe headaches on and off for months, usually on one side of your head.".into(),
                "The pain gets worse with movement, and you sometimes feel like you might vomit. You prefer a dark, quiet room.".into(),
                "You notice triggers such as certain foods, lack of sleep, or your periods. Your mother also had similar headaches.".into(),
            ],
            hints: vec![
                "Consider primary headache disorders with triggers and family history.".into(),
                "Think of conditions where patients avoid light and movement during attacks.".into(),
            ],
            expected_diagnosis: "migraine".into(),
            diagnosis_synonyms: vec![],
            expected_treatment_keywords: vec![
                "triptan".into(),
                "sumatriptan".into(),
                "propranolol".into(),
                "preventive".into(),
                "NSAID".into(),
                "ibuprofen".into(),
                "paracetamol".into(),
            ],
        },
        ScenarioDefinition {
            id: "neuro_4_focal_seizure".into(),
            specialty: "neurology".into(),
            level: 4,
            difficulty: Difficulty::Hard,
            patient_name: "Sandeep Kulkarni".into(),
            age: 35,
            gender: "M".into(),
            chief_complaint: "Strange episodes with staring spells".into(),
            stages: vec![
                "You sometimes have brief episodes where you suddenly stop what you're doing and stare blankly for a short time.".into(),
                "During these episodes, one side of your face or hand may twitch, and you don't respond properly to people around you.".into(),
                "Afterwards, you feel confused or tired for a few minutes and don't fully remember what happened.".into(),
            ],
            hints: vec![
                "Think beyond headaches and consider paroxysmal neurological events.".into(),
                "These episodes are stereotyped, brief, and followed by confusion.".into(),
            ],
            expected_diagnosis: "focal seizures".into(),
            diagnosis_synonyms: vec!["focal seizures".into(), "focal epilepsy".into()],
            expected_treatment_keywords: vec![
                "antiepileptic".into(),
                "levetiracetam".into(),
                "carbamazepine".into(),
                "sodium valproate".into(),
            ],
        },
        ScenarioDefinition {
            id: "neuro_5_stroke".into(),
            specialty: "neurology".into(),
            level: 5,
            difficulty: Difficulty::Hard,
            patient_name: "Meena Reddy".into(),
            age: 62,
            gender: "F".into(),
            chief_complaint: "Sudden weakness on one side".into(),
            stages: vec![
                "A few hours ago, you suddenly noticed weakness in your right arm and leg.".into(),
                "Your family also noticed that your speech became slurred and your mouth seems to droop on one side.".into(),
                "You have a history of high blood pressure and diabetes. You were sitting quietly when this started suddenly.".into(),
            ],
            hints: vec![
                "Think of emergency neurological conditions with sudden onset.".into(),
                "Remember the FAST mnemonic: Face drooping, Arm weakness, Speech difficulty, Time to act.".into(),
            ],
            expected_diagnosis: "acute ischemic stroke".into(),
            diagnosis_synonyms: vec![
                "acute ischemic stroke".into(),
                "ischemic stroke".into(),
                "stroke".into(),
            ],
            expected_treatment_keywords: vec![
                "stroke protocol".into(),
                "thrombolysis".into(),
                "aspirin".into(),
                "clopidogrel".into(),
                "blood pressure control".into(),
                "statin".into(),
            ],
        },
        // -------------------- cardiology --------------------
        ScenarioDefinition {
            id: "cardio_1_stable_angina".into(),
            specialty: "cardiology".into(),
            level: 1,
            difficulty: Difficulty::Easy,
            patient_name: "Vikas Jain".into(),
            age: 55,
            gender: "M".into(),
            chief_complaint: "Chest discomfort on walking".into(),
            stages: vec![
                "You feel a heaviness or tightness in the middle of your chest when you walk fast or climb stairs.".into(),
                "The discomfort goes away in a few minutes when you rest. It does not usually happen at rest.".into(),
                "Sometimes the pain travels to your left arm or jaw. You have diabetes and high cholesterol.".into(),
            ],
            hints: vec![
                "Think about exertional chest pain that improves with rest.".into(),
                "Consider chronic, predictable chest pain related to coronary artery disease.".into(),
            ],
            expected_diagnosis: "stable angina".into(),
            diagnosis_synonyms: vec!["stable angina".into(), "angina".into()],
            expected_treatment_keywords: vec![
                "nitroglycerin".into(),
                "aspirin".into(),
                "beta blocker".into(),
                "statin".into(),
                "lifestyle".into(),
                "risk factor control".into(),
            ],
        },
        ScenarioDefinition {
            id: "cardio_2_hypertension".into(),
            specialty: "cardiology".into(),
            level: 2,
            difficulty: Difficulty::Easy,
            patient_name: "Sunita Menon".into(),
            age: 48,
            gender: "F".into(),
            chief_complaint: "Occasional headaches and high BP readings".into(),
            stages: vec![
                "You feel occasional headaches and a sense of heaviness, especially in the mornings.".into(),
                "At a recent check-up, your blood pressure was found to be high on more than one occasion.".into(),
                "You have a sedentary lifestyle, eat salty food, and there is a family history of high blood pressure.".into(),
            ],
            hints: vec![
                "Think of a very common chronic condition picked up on regular BP checks.".into(),
                "First-line management often includes lifestyle changes and simple oral medicines.".into(),
            ],
            expected_diagnosis: "primary hypertension".into(),
            diagnosis_synonyms: vec!["primary hypertension".into(), "essential hypertension".into()],
            expected_treatment_keywords: vec![
                "ACE inhibitor".into(),
                "amlodipine".into(),
                "ARB".into(),
                "blood pressure tablet".into(),
                "lifestyle changes".into(),
                "salt restriction".into(),
                "exercise".into(),
            ],
        },
        ScenarioDefinition {
            id: "cardio_3_heart_failure".into(),
            specialty: "cardiology".into(),
            level: 3,
            difficulty: Difficulty::Medium,
            patient_name: "Ramesh Patel".into(),
            age: 65,
            gender: "M".into(),
            chief_complaint: "Breathlessness on walking".into(),
            stages: vec![
                "You feel short of breath when walking even short distances, which is new for you in the last few weeks.".into(),
                "You notice swelling around your ankles by evening and sometimes wake up at night feeling breathless.".into(),
                "You had a heart attack a few years ago and have not been regular with your medications.".into(),
            ],
            hints: vec![
                "Think of chronic heart conditions that cause fluid overload and breathlessness.".into(),
                "Look for history of previous heart attack and ankle swelling.".into(),
            ],
            expected_diagnosis: "chronic heart failure".into(),
            diagnosis_synonyms: vec!["chronic heart failure".into(), "heart failure".into()],
            expected_treatment_keywords: vec![
                "diuretic".into(),
                "furosemide".into(),
                "ACE inhibitor".into(),
                "beta blocker".into(),
                "spironolactone".into(),
                "fluid restriction".into(),
            ],
        },
        ScenarioDefinition {
            id: "cardio_4_unstable_angina".into(),
            specialty: "cardiology".into(),
            level: 4,
            difficulty: Difficulty::Hard,
            patient_name: "Iqbal Khan".into(),
            age: 58,
            gender: "M".into(),
            chief_complaint: "Chest pain at rest".into(),
            stages: vec![
                "You now get chest pain even at rest, not only on walking. It feels like heavy pressure in the center of your chest.".into(),
                "The pain has become more frequent and severe over the last few days.".into(),
                "You feel sweaty and anxious during these episodes. You are a smoker with diabetes and high cholesterol.".into(),
            ],
            hints: vec![
                "This is more serious than stable exertional pain; symptoms at rest are concerning.".into(),
                "Think about acute coronary syndromes and the need for urgent evaluation.".into(),
            ],
            expected_diagnosis: "unstable angina / acute coronary syndrome".into(),
            diagnosis_synonyms: vec![
                "unstable angina".into(),
                "acute coronary syndrome".into(),
            ],
            expected_treatment_keywords: vec![
                "aspirin".into(),
                "clopidogrel".into(),
                "heparin".into(),
                "nitroglycerin".into(),
                "emergency".into(),
                "admission".into(),
                "ECG".into(),
                "reperfusion".into(),
            ],
        },
        ScenarioDefinition {
            id: "cardio_5_acute_mi".into(),
            specialty: "cardiology".into(),
            level: 5,
            difficulty: Difficulty::Hard,
            patient_name: "Rita D'Souza".into(),
            age: 60,
            gender: "F".into(),
            chief_complaint: "Severe chest pain with sweating".into(),
            stages: vec![
                "You suddenly developed severe, crushing pain in the center of your chest about an hour ago.".into(),
                "The pain is constant, does not improve with rest, and radiates to your left arm and jaw.".into(),
                "You are sweating a lot, feel very anxious, and slightly breathless. This has never happened before.".into(),
            ],
            hints: vec![
                "Think of a life-threatening emergency related to the heart.".into(),
                "Immediate hospital-based treatment to open a blocked artery is crucial in this scenario.".into(),
            ],
            expected_diagnosis: "acute myocardial infarction".into(),
            diagnosis_synonyms: vec![
                "acute myocardial infarction".into(),
                "heart attack".into(),
                "STEMI".into(),
            ],
            expected_treatment_keywords: vec![
                "aspirin".into(),
                "clopidogrel".into(),
                "thrombolysis".into(),
                "PCI".into(),
                "oxygen".into(),
                "morphine".into(),
                "nitrate".into(),
            ],
        },
        // -------------------- respiratory --------------------
        ScenarioDefinition {
            id: "resp_1_upper_respiratory_infection".into(),
            specialty: "respiratory".into(),
            level: 1,
            difficulty: Difficulty::Easy,
            patient_name: "Karan Singh".into(),
            age: 22,
            gender: "M".into(),
            chief_complaint: "Sore throat and runny nose".into(),
            stages: vec![
                "You have had a sore throat and runny nose for the last few days.".into(),
                "You have a mild cough with clear mucus, and a low-grade fever.".into(),
                "You feel generally tired but can carry on your daily work. No shortness of breath or chest pain.".into(),
            ],
            hints: vec![
                "Think of very common self-limiting infections involving nose and throat.".into(),
                "Usually managed with rest, fluids, and simple medicines rather than strong antibiotics.".into(),
            ],
            expected_diagnosis: "upper respiratory tract infection".into(),
            diagnosis_synonyms: vec![
                "upper respiratory tract infection".into(),
                "upper respiratory infection".into(),
                "common cold".into(),
            ],
            expected_treatment_keywords: vec![
                "symptomatic".into(),
                "paracetamol".into(),
                "rest".into(),
                "fluids".into(),
                "steam inhalation".into(),
            ],
        },
        ScenarioDefinition {
            id: "resp_2_acute_bronchitis".into(),
            specialty: "respiratory".into(),
            level: 2,
            difficulty: Difficulty::Easy,
            patient_name: "Mehul Shah".into(),
            age: 35,
            gender: "M".into(),
            chief_complaint: "Cough after a viral illness".into(),
            stages: vec![
                "You developed a cough after having a cold a week ago.".into(),
                "You now have a persistent cough with some yellowish sputum, but no major breathing difficulty.".into(),
                "You feel chest discomfort when you cough, but your oxygen levels and general activity are okay.".into(),
            ],
            hints: vec![
                "Think of a chest infection that often follows a cold but is usually mild.".into(),
                "Treatment is often supportive; antibiotics are not always necessary.".into(),
            ],
            expected_diagnosis: "acute bronchitis".into(),
            diagnosis_synonyms: vec!["acute bronchitis".into(), "bronchitis".into()],
            expected_treatment_keywords: vec![
                "symptomatic".into(),
                "cough syrup".into(),
                "inhaler".into(),
                "rest".into(),
                "sometimes antibiotic".into(),
            ],
        },
        ScenarioDefinition {
            id: "resp_3_asthma".into(),
            specialty: "respiratory".into(),
            level: 3,
            difficulty: Difficulty::Medium,
            patient_name: "Shruti Nair".into(),
            age: 19,
            gender: "F".into(),
            chief_complaint: "Wheezing and breathlessness".into(),
            stages: vec![
                "You get episodes of wheezing and shortness of breath, especially at night or with exercise.".into(),
                "Sometimes you feel tightness in your chest and need to sit up to breathe easier.".into(),
                "You have a history of allergies, and these episodes improve after using an inhaler given earlier.".into(),
            ],
            hints: vec![
                "Think of chronic airway diseases with episodic wheezing and triggers.".into(),
                "Often treated with inhalers that open the airways and reduce inflammation.".into(),
            ],
            expected_diagnosis: "bronchial asthma".into(),
            diagnosis_synonyms: vec!["bronchial asthma".into(), "asthma".into()],
            expected_treatment_keywords: vec![
                "inhaler".into(),
                "salbutamol".into(),
                "bronchodilator".into(),
                "steroid inhaler".into(),
                "controller".into(),
                "reliever".into(),
            ],
        },
        ScenarioDefinition {
            id: "resp_4_copd_exacerbation".into(),
            specialty: "respiratory".into(),
            level: 4,
            difficulty: Difficulty::Hard,
            patient_name: "Naresh Yadav".into(),
            age: 68,
            gender: "M".into(),
            chief_complaint: "Worsening breathlessness".into(),
            stages: vec![
                "You have been a smoker for many years and have had long-standing breathlessness on exertion.".into(),
                "In the last few days, your cough and breathlessness have suddenly worsened.".into(),
                "You now produce more sputum, sometimes yellow or green, and feel breathless even at rest.".into(),
            ],
            hints: vec![
                "Think of chronic lung disease in smokers with sudden worsening symptoms.".into(),
                "Treatment often involves bronchodilators, steroids, and sometimes antibiotics and oxygen.".into(),
            ],
            expected_diagnosis: "COPD exacerbation".into(),
            diagnosis_synonyms: vec!["COPD exacerbation".into(), "COPD".into()],
            expected_treatment_keywords: vec![
                "bronchodilator".into(),
                "nebulizer".into(),
                "inhaler".into(),
                "steroid".into(),
                "antibiotic".into(),
                "oxygen".into(),
            ],
        },
        ScenarioDefinition {
            id: "resp_5_pneumonia".into(),
            specialty: "respiratory".into(),
            level: 5,
            difficulty: Difficulty::Hard,
            patient_name: "Anil Joshi".into(),
            age: 50,
            gender: "M".into(),
            chief_complaint: "High fever and cough with breathlessness".into(),
            stages: vec![
                "You have had high fever and chills for a few days.".into(),
                "You developed a cough with thick, yellowish sputum and pain in your chest when you take a deep breath.".into(),
                "Now you feel breathless even at rest and very weak. You struggle to walk due to breathlessness.".into(),
            ],
            hints: vec![
                "Think of a serious lung infection involving air sacs of the lungs.".into(),
                "Management often requires antibiotics and sometimes hospital admission.".into(),
            ],
            expected_diagnosis: "community-acquired pneumonia".into(),
            diagnosis_synonyms: vec!["community-acquired pneumonia".into(), "pneumonia".into()],
            expected_treatment_keywords: vec![
                "antibiotic".into(),
                "amoxicillin".into(),
                "azithromycin".into(),
                "ceftriaxone".into(),
                "hospital".into(),
                "oxygen".into(),
            ],
        },
        // -------------------- gastroenterology --------------------
        ScenarioDefinition {
            id: "gi_1_dyspepsia".into(),
            specialty: "gastroenterology".into(),
            level: 1,
            difficulty: Difficulty::Easy,
            patient_name: "Rahul Mishra".into(),
            age: 29,
            gender: "M".into(),
            chief_complaint: "Upper abdominal discomfort after meals".into(),
            stages: vec![
                "You feel a burning or heavy sensation in the upper part of your abdomen after meals.".into(),
                "The discomfort is worse after spicy or oily food and improves with simple antacid syrup.".into(),
                "You do not have weight loss, vomiting, or blood in stool. It mainly feels like indigestion.".into(),
            ],
            hints: vec![
                "Think of common 'acidity' or indigestion-like problems.".into(),
                "Simple lifestyle changes and antacids or acid-suppressing tablets often help.".into(),
            ],
            expected_diagnosis: "functional dyspepsia / acid peptic symptoms".into(),
            diagnosis_synonyms: vec![
                "functional dyspepsia".into(),
                "dyspepsia".into(),
                "acid peptic disease".into(),
            ],
            expected_treatment_keywords: vec![
                "antacid".into(),
                "PPI".into(),
                "omeprazole".into(),
                "pantoprazole".into(),
                "diet changes".into(),
                "smaller meals".into(),
            ],
        },
        ScenarioDefinition {
            id: "gi_2_gerd".into(),
            specialty: "gastroenterology".into(),
            level: 2,
            difficulty: Difficulty::Easy,
            patient_name: "Neha Sharma".into(),
            age: 40,
            gender: "F".into(),
            chief_complaint: "Burning in chest after meals".into(),
            stages: vec![
                "You feel a burning sensation in your chest after meals, especially when lying down.".into(),
                "Sometimes food or sour liquid comes up into your mouth.".into(),
                "Symptoms get worse after spicy or heavy meals and late-night eating.".into(),
            ],
            hints: vec![
                "Think of acid from the stomach coming up into the food pipe.".into(),
                "Treatment usually includes PPIs and lifestyle changes like elevating the head of the bed.".into(),
            ],
            expected_diagnosis: "gastroesophageal reflux disease".into(),
            diagnosis_synonyms: vec![
                "gastroesophageal reflux disease".into(),
                "GERD".into(),
                "acid reflux".into(),
            ],
            expected_treatment_keywords: vec![
                "PPI".into(),
                "omeprazole".into(),
                "pantoprazole".into(),
                "rabeprazole".into(),
                "H2 blocker".into(),
                "ranitidine".into(),
            ],
        },
        ScenarioDefinition {
            id: "gi_3_ibd".into(),
            specialty: "gastroenterology".into(),
            level: 3,
            difficulty: Difficulty::Medium,
            patient_name: "Sonia Arora".into(),
            age: 26,
            gender: "F".into(),
            chief_complaint: "Recurrent loose stools with pain".into(),
            stages: vec![
                "You have had recurrent episodes of loose stools for several months.".into(),
                "Sometimes you notice mucus and small amounts of blood in the stool.".into(),
                "You also have crampy abdominal pain, weight loss, and fatigue between flares.".into(),
            ],
            hints: vec![
                "Think of chronic inflammatory conditions of the intestine, not just simple infection.".into(),
                "Management often includes anti-inflammatory medicines and long-term follow-up.".into(),
            ],
            expected_diagnosis: "inflammatory bowel disease".into(),
            diagnosis_synonyms: vec![
                "inflammatory bowel disease".into(),
                "ulcerative colitis".into(),
                "crohn disease".into(),
            ],
            expected_treatment_keywords: vec![
                "5-ASA".into(),
                "mesalamine".into(),
                "steroid".into(),
                "immunosuppressant".into(),
                "colon".into(),
                "gastroenterologist".into(),
            ],
        },
        ScenarioDefinition {
            id: "gi_4_acute_pancreatitis".into(),
            specialty: "gastroenterology".into(),
            level: 4,
            difficulty: Difficulty::Hard,
            patient_name: "Deepak Tiwari".into(),
            age: 38,
            gender: "M".into(),
            chief_complaint: "Severe upper abdominal pain".into(),
            stages: vec![
                "You suddenly developed severe pain in the upper abdomen that radiates to your back.".into(),
                "The pain is constant, and you feel very nauseous and have vomited several times.".into(),
                "You drink alcohol regularly on weekends or more, and this episode started after a heavy meal and drinking.".into(),
            ],
            hints: vec![
                "Think of acute inflammation of an organ behind the stomach, often related to alcohol or gallstones.".into(),
                "Management usually requires hospital admission, IV fluids, and pain control.".into(),
            ],
            expected_diagnosis: "acute pancreatitis".into(),
            diagnosis_synonyms: vec!["acute pancreatitis".into(), "pancreatitis".into()],
            expected_treatment_keywords: vec![
                "hospital".into(),
                "IV fluids".into(),
                "pain control".into(),
                "nil by mouth".into(),
                "pancreatitis".into(),
            ],
        },
        ScenarioDefinition {
            id: "gi_5_upper_gi_bleed".into(),
            specialty: "gastroenterology".into(),
            level: 5,
            difficulty: Difficulty::Hard,
            patient_name: "Harish Kumar".into(),
            age: 52,
            gender: "M".into(),
            chief_complaint: "Vomiting blood".into(),
            stages: vec![
                "You suddenly vomited a large amount of dark red or coffee-colored material.".into(),
                "You felt dizzy and weak afterwards, and your stools have turned black.".into(),
                "You have a history of taking painkillers regularly and sometimes drink alcohol.".into(),
            ],
            hints: vec![
                "Think of serious bleeding from the upper digestive tract.".into(),
                "Management often requires urgent endoscopy, IV fluids, and blood transfusion.".into(),
            ],
            expected_diagnosis: "upper gastrointestinal bleed".into(),
            diagnosis_synonyms: vec![
                "upper gastrointestinal bleed".into(),
                "upper GI bleed".into(),
            ],
            expected_treatment_keywords: vec![
                "endoscopy".into(),
                "PPI infusion".into(),
                "IV fluids".into(),
                "blood transfusion".into(),
                "hospital".into(),
                "emergency".into(),
            ],
        },
        // -------------------- endocrinology --------------------
        ScenarioDefinition {
            id: "endo_1_type2_diabetes".into(),
            specialty: "endocrinology".into(),
            level: 1,
            difficulty: Difficulty::Easy,
            patient_name: "Anil Kumar".into(),
            age: 50,
            gender: "M".into(),
            chief_complaint: "Increased thirst and urination".into(),
            stages: vec![
                "You feel very thirsty and need to drink water frequently.".into(),
                "You also pass urine more often than before, including at night.".into(),
                "You feel more tired and have noticed some weight loss. A recent blood test showed high sugar levels.".into(),
            ],
            hints: vec![
                "Think of a very common endocrine condition related to blood sugar.".into(),
                "Initial management often includes lifestyle changes and oral medicines.".into(),
            ],
            expected_diagnosis: "type 2 diabetes mellitus".into(),
            diagnosis_synonyms: vec!["type 2 diabetes mellitus".into(), "type 2 diabetes".into()],
            expected_treatment_keywords: vec![
                "metformin".into(),
                "diet control".into(),
                "exercise".into(),
                "oral hypoglycemic".into(),
                "blood sugar".into(),
            ],
        },
        ScenarioDefinition {
            id: "endo_2_hypothyroidism".into(),
            specialty: "endocrinology".into(),
            level: 2,
            difficulty: Difficulty::Easy,
            patient_name: "Pooja Rao".into(),
            age: 35,
            gender: "F".into(),
            chief_complaint: "Weight gain and tiredness".into(),
            stages: vec![
                "You feel tired most of the time and have gained weight without major changes in diet.".into(),
                "You feel cold more easily than others and your skin is becoming dry.".into(),
                "Your periods have become irregular, and a recent blood test showed abnormal thyroid levels.".into(),
            ],
            hints: vec![
                "Think of an underactive gland in the neck controlling metabolism.".into(),
                "Treatment often uses a daily hormone tablet to replace what the body is not making.".into(),
            ],
            expected_diagnosis: "hypothyroidism".into(),
            diagnosis_synonyms: vec![],
            expected_treatment_keywords: vec![
                "thyroxine".into(),
                "levothyroxine".into(),
                "thyroid hormone".into(),
                "TSH".into(),
                "replacement".into(),
            ],
        },
        ScenarioDefinition {
            id: "endo_3_hyperthyroidism".into(),
            specialty: "endocrinology".into(),
            level: 3,
            difficulty: Difficulty::Medium,
            patient_name: "Ritu Malhotra".into(),
            age: 28,
            gender: "F".into(),
            chief_complaint: "Weight loss and palpitations".into(),
            stages: vec![
                "You have lost weight despite eating normally or even more than usual.".into(),
                "You feel your heart racing, get sweaty easily, and feel anxious or irritable.".into(),
                "You sometimes notice your hands tremble and find it hard to tolerate heat. A test showed very low TSH.".into(),
            ],
            hints: vec![
                "Think of an overactive thyroid gland causing high metabolism.".into(),
                "Treatment may involve tablets to reduce thyroid hormone levels, and sometimes other options.".into(),
            ],
            expected_diagnosis: "hyperthyroidism".into(),
            diagnosis_synonyms: vec![],
            expected_treatment_keywords: vec![
                "carbimazole".into(),
                "propylthiouracil".into(),
                "beta blocker".into(),
                "antithyroid".into(),
                "thyroid".into(),
            ],
        },
        ScenarioDefinition {
            id: "endo_4_dka".into(),
            specialty: "endocrinology".into(),
            level: 4,
            difficulty: Difficulty::Hard,
            patient_name: "Manoj Singh".into(),
            age: 20,
            gender: "M".into(),
            chief_complaint: "Abdominal pain and vomiting in a known diabetic".into(),
            stages: vec![
                "You have type 1 diabetes and have missed some insulin doses recently.".into(),
                "You now have severe abdominal pain, nausea, and repeated vomiting.".into(),
                "You feel very weak, drowsy, breathe fast, and your breath smells fruity or like nail polish remover.".into(),
            ],
            hints: vec![
                "Think of an acute, life-threatening emergency related to very high blood sugar and ketones.".into(),
                "Management requires hospital admission, IV insulin, and careful fluid and electrolyte correction.".into(),
            ],
            expected_diagnosis: "diabetic ketoacidosis".into(),
            diagnosis_synonyms: vec!["diabetic ketoacidosis".into(), "DKA".into()],
            expected_treatment_keywords: vec![
                "IV insulin".into(),
                "IV fluids".into(),
                "ICU".into(),
                "electrolytes".into(),
                "emergency".into(),
                "DKA".into(),
            ],
        },
        ScenarioDefinition {
            id: "endo_5_adrenal_crisis".into(),
            specialty: "endocrinology".into(),
            level: 5,
            difficulty: Difficulty::Hard,
            patient_name: "Farah Ali".into(),
            age: 45,
            gender: "F".into(),
            chief_complaint: "Severe weakness and low blood pressure".into(),
            stages: vec![
                "You feel extremely weak, dizzy, and have lost weight over the past few months.".into(),
                "Your blood pressure has been low, and you feel faint when standing up.".into(),
                "Recently, after a minor illness, you became very unwell with vomiting, abdominal pain, and confusion.".into(),
            ],
            hints: vec![
                "Think of failure of a gland above the kidneys that makes cortisol.".into(),
                "In emergencies, this is treated with IV steroids and fluids.".into(),
            ],
            expected_diagnosis: "adrenal crisis in adrenal insufficiency".into(),
            diagnosis_synonyms: vec![
                "adrenal crisis".into(),
                "adrenal insufficiency".into(),
                "addisonian crisis".into(),
            ],
            expected_treatment_keywords: vec![
                "IV hydrocortisone".into(),
                "steroid".into(),
                "IV fluids".into(),
                "adrenal insufficiency".into(),
                "emergency".into(),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::ScenarioFilter;
    use std::collections::BTreeMap;
    use std::io::Write;

    #[test]
    fn test_default_catalog_is_well_formed() {
        let catalog = BuiltinCatalog::default();
        assert_eq!(catalog.scenarios().len(), 25);
        for case in catalog.scenarios() {
            assert!(!case.id.is_empty());
            assert!(!case.expected_diagnosis.is_empty());
            assert!(!case.stages.is_empty(), "case {} has no stages", case.id);
            assert!((1..=5).contains(&case.level), "case {} level", case.id);
        }
    }

    #[test]
    fn test_default_catalog_covers_levels_one_to_five() {
        let catalog = BuiltinCatalog::default();
        let mut by_specialty: BTreeMap<String, Vec<u32>> = BTreeMap::new();
        for case in catalog.scenarios() {
            by_specialty
                .entry(case.specialty.clone())
                .or_default()
                .push(case.level);
        }
        assert_eq!(by_specialty.len(), 5);
        for (specialty, mut levels) in by_specialty {
            levels.sort_unstable();
            assert_eq!(levels, vec![1, 2, 3, 4, 5], "levels for {}", specialty);
        }
    }

    #[test]
    fn test_difficulty_matches_level_tiers() {
        for case in BuiltinCatalog::default().scenarios() {
            let expected = match case.level {
                1 | 2 => Difficulty::Easy,
                3 => Difficulty::Medium,
                _ => Difficulty::Hard,
            };
            assert_eq!(case.difficulty, expected, "difficulty for {}", case.id);
        }
    }

    #[test]
    fn test_select_exact_specialty_and_level() {
        let catalog = BuiltinCatalog::default();
        let filter = ScenarioFilter {
            specialty: Some("neurology".into()),
            level: Some(1),
            difficulty: None,
        };
        let chosen = catalog.select(&filter).unwrap();
        assert_eq!(chosen.id, "neuro_1_tension_headache");
    }

    #[test]
    fn test_select_falls_back_when_filters_match_nothing() {
        let catalog = BuiltinCatalog::default();
        let filter = ScenarioFilter {
            specialty: Some("astrology".into()),
            level: Some(99),
            difficulty: None,
        };
        // Unknown filters fall back to the unfiltered catalog.
        catalog.select(&filter).unwrap();
    }

    #[test]
    fn test_select_by_difficulty_alone() {
        let catalog = BuiltinCatalog::default();
        let filter = ScenarioFilter {
            specialty: None,
            level: None,
            difficulty: Some(Difficulty::Hard),
        };
        let chosen = catalog.select(&filter).unwrap();
        assert_eq!(chosen.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_select_empty_catalog_errors() {
        let catalog = BuiltinCatalog::new(vec![]);
        assert!(catalog.select(&ScenarioFilter::default()).is_err());
    }

    #[test]
    fn test_specialties_and_levels_listing() {
        let catalog = BuiltinCatalog::default();
        let specialties = catalog.specialties();
        assert_eq!(specialties.len(), 5);
        assert!(specialties.contains(&"neurology".to_string()));
        assert!(specialties.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(catalog.levels("neurology"), vec![1, 2, 3, 4, 5]);
        assert!(catalog.levels("astrology").is_empty());
    }

    #[test]
    fn test_from_toml_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[[scenario]]
id = "custom_1"
specialty = "neurology"
level = 1
difficulty = "easy"
patient_name = "Test Patient"
age = 30
gender = "F"
chief_complaint = "Headache"
stages = ["Stage one text."]
hints = ["A hint."]
expected_diagnosis = "migraine"
expected_treatment_keywords = ["triptan", "NSAID"]
"#
        )
        .unwrap();

        let catalog = BuiltinCatalog::from_toml_path(file.path()).unwrap();
        assert_eq!(catalog.scenarios().len(), 1);
        let case = &catalog.scenarios()[0];
        assert_eq!(case.id, "custom_1");
        assert_eq!(case.difficulty, Difficulty::Easy);
        assert!(case.diagnosis_synonyms.is_empty());
        assert_eq!(case.max_stage(), 0);
    }
}
